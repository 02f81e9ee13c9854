// All LLM prompt constants for the Generation module.
// The JSON-only system prompt comes from llm_client::prompts.

/// Mock interview prompt template.
/// Replace: {position}, {experience_years}, {tech_stack}, {description}
pub const INTERVIEW_PROMPT_TEMPLATE: &str = r#"Conduct a realistic mock interview based on the following job details and generate exactly 5 interview questions with concise, high-quality answers.

STRICT REQUIREMENTS:
- Questions must be REAL interview questions commonly asked for this role
- Questions must strictly match the candidate's experience level
- Avoid theoretical definitions unless experience is junior
- Focus on practical, scenario-based, and decision-making questions
- Keep answers short, clear, and interview-ready (5-8 lines max)
- No overly verbose or textbook-style answers
- No introductions, explanations, or extra text

QUESTION DISTRIBUTION:
1. Core concept from the tech stack
2. Practical problem or real-world scenario
3. Best practices / performance / optimization
4. Common interview "trap" or mistake question
5. Experience-based or project-related question

JOB DETAILS:
- Role: {position}
- Years of Experience: {experience_years}
- Tech Stack: {tech_stack}
- Job Description: {description}

OUTPUT FORMAT (STRICT):
Return ONLY a valid JSON array like this:

[
  { "question": "Question text", "answer": "Answer text" },
  ...
]

Do NOT include markdown, code blocks, headings, or any extra text."#;
