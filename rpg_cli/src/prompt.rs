//! Line-based prompts on stdin/stdout

use std::io::{self, BufRead, StdinLock, Write};

pub struct Prompt {
    lines: io::Lines<StdinLock<'static>>,
}

impl Prompt {
    pub fn stdin() -> Self {
        Prompt {
            lines: io::stdin().lock().lines(),
        }
    }

    /// Ask a question; `None` once stdin is closed
    pub fn ask(&mut self, question: &str) -> Option<String> {
        print!("{} ", question);
        let _ = io::stdout().flush();
        match self.lines.next() {
            Some(Ok(line)) => Some(line.trim().to_string()),
            _ => None,
        }
    }

    /// Pick an entry from a numbered list; blank or out-of-range input picks nothing
    pub fn choose<'a, T>(&mut self, title: &str, options: &'a [T], label: impl Fn(&T) -> String) -> Option<&'a T> {
        if options.is_empty() {
            println!("Nothing to choose from.");
            return None;
        }
        println!("{}", title);
        for (idx, option) in options.iter().enumerate() {
            println!("  {}) {}", idx + 1, label(option));
        }
        let answer = self.ask(">")?;
        let idx: usize = answer.parse().ok()?;
        options.get(idx.checked_sub(1)?)
    }
}
