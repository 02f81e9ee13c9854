// Practice flow: answer submission and per-interview feedback.

pub mod handlers;
