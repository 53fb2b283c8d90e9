//! Console output: colored status text, plan listing, pause prompt.

use std::io::{self, BufRead, Write};

use is_terminal::IsTerminal;
use owo_colors::OwoColorize;

use crate::bootstrap::{Action, Plan};

pub struct TextPrinter {
    pub color: Option<&'static str>,
}

impl TextPrinter {
    pub fn print(&self, text: &str) {
        match self.color {
            Some("green") => println!("{}", text.green()),
            Some("cyan") => println!("{}", text.cyan()),
            Some("yellow") => println!("{}", text.yellow()),
            Some("red") => println!("{}", text.red()),
            _ => println!("{}", text),
        }
    }
}

/// Where the end-of-session messages go.
pub trait Console {
    /// Show a failure the operator must see.
    fn failure(&self, message: &str);
    /// Keep the session open until the operator acknowledges.
    fn pause(&self);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalConsole;

impl Console for TerminalConsole {
    fn failure(&self, message: &str) {
        eprintln!();
        eprintln!("{} {}", "error:".red().bold(), message.red());
    }

    fn pause(&self) {
        // Nobody to acknowledge when stdin is piped.
        if !io::stdin().is_terminal() {
            return;
        }
        print!("Press Enter to close...");
        io::stdout().flush().ok();
        let mut line = String::new();
        let _ = io::stdin().lock().read_line(&mut line);
    }
}

pub fn print_plan(plan: &Plan) {
    let head = TextPrinter { color: Some("cyan") };
    head.print(&format!("interpreter: {}", plan.interpreter.display()));
    for (i, action) in plan.actions.iter().enumerate() {
        let line = match action {
            Action::Install(spec) => format!("{}. install   {}", i + 1, spec),
            Action::OpenBrowser { url, delay } => {
                format!("{}. browser   {} after {} ms", i + 1, url, delay.as_millis())
            }
            Action::Launch(spec) => format!("{}. launch    {}", i + 1, spec),
        };
        TextPrinter { color: None }.print(&line);
    }
}
