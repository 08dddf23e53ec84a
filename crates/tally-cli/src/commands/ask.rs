//! Question commands: a single question, or a stream of them from stdin

use std::io::BufRead;

use anyhow::{Context, Result};
use tally_core::{Answer, Session};

pub fn cmd_ask(session: &Session, question: &str, json: bool) -> Result<()> {
    let answer = session.ask(question);
    print_answer(&answer, json)
}

/// Answer each non-blank line of `input`. Returns how many questions were answered.
pub fn cmd_chat<R: BufRead>(session: &Session, input: R, json: bool) -> Result<usize> {
    if !json {
        println!("💬 Ask about spending last month, income, or your biggest expense.");
        println!("   One question per line; end input to quit.");
    }

    let mut answered = 0;
    for line in input.lines() {
        let line = line.context("Failed to read question")?;
        let question = line.trim();
        if question.is_empty() {
            continue;
        }

        print_answer(&session.ask(question), json)?;
        answered += 1;
    }

    Ok(answered)
}

fn print_answer(answer: &Answer, json: bool) -> Result<()> {
    if json {
        // One JSON object per line so chat output stays streamable
        let line = serde_json::to_string(answer).context("Failed to serialize answer")?;
        println!("{}", line);
    } else {
        println!("{}", answer.text);
    }
    Ok(())
}
