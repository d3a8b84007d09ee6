/*!
## Terminal

Batch runs of a whole program, and the interactive loop that applies
one line at a time to a stack that survives errors.

*/

use crate::lang::{Column, Error, Source};
use crate::mach::Runtime;
use ansi_term::Style;
use linefeed::{Interface, ReadResult, Signal};
use std::io::{BufRead, IsTerminal, Write};
use std::sync::atomic::Ordering;
use tracing::{debug, warn};

const PROMPT: &str = ">>> ";

/// Run a whole program, then show the stack unless the program printed.
pub fn batch(runtime: &mut Runtime, source: Source) -> Result<(), Error> {
    let result = runtime.run(source);
    let mut stdout = std::io::stdout().lock();
    for line in runtime.take_output() {
        writeln!(stdout, "{}", line)?;
    }
    result?;
    if !runtime.stack().has_printed() {
        writeln!(stdout, "{}", runtime.stack())?;
    }
    Ok(())
}

/// Read, apply and report line by line until end of input.
pub fn interactive(mut runtime: Runtime) -> std::io::Result<()> {
    let interrupted = runtime.interrupt_handle();
    if let Err(error) = ctrlc::set_handler(move || interrupted.store(true, Ordering::SeqCst)) {
        warn!(%error, "no interrupt handler");
    }
    if std::io::stdin().is_terminal() {
        edit_loop(&mut runtime)?;
    } else {
        plain_loop(&mut runtime)?;
    }
    if !runtime.stack().has_printed() {
        println!("{}", runtime.stack());
    }
    Ok(())
}

fn edit_loop(runtime: &mut Runtime) -> std::io::Result<()> {
    let interface = Interface::new("fiddle")?;
    interface.set_prompt(PROMPT)?;
    interface.set_report_signal(Signal::Interrupt, true);
    loop {
        let line = match interface.read_line()? {
            ReadResult::Input(line) => line,
            ReadResult::Signal(Signal::Interrupt) => {
                interface.set_buffer("")?;
                continue;
            }
            ReadResult::Signal(_) | ReadResult::Eof => break,
        };
        let report = enter(runtime, &line);
        interface.write_fmt(format_args!("{}", report))?;
        if !line.trim().is_empty() {
            interface.add_history_unique(line);
        }
    }
    Ok(())
}

fn plain_loop(runtime: &mut Runtime) -> std::io::Result<()> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    for line in stdin.lock().lines() {
        let line = line?;
        write!(stdout, "{}", enter(runtime, &line))?;
    }
    Ok(())
}

/// Apply one line and describe what happened.
fn enter(runtime: &mut Runtime, line: &str) -> String {
    debug!(line, "enter");
    let result = runtime.run(Source::Text(line));
    let mut report = String::new();
    for printed in runtime.take_output() {
        report.push_str(&printed);
        report.push('\n');
    }
    if let Err(error) = result {
        warn!(%error, "line failed");
        if error.column() != (0..0) {
            report.push_str(&underline(line, &error.column()));
            report.push('\n');
        }
        report.push_str(&Style::new().bold().paint(error.to_string()).to_string());
        report.push('\n');
    }
    report
}

/// Underline the characters of `line` inside a byte column.
fn underline(line: &str, column: &Column) -> String {
    let style = Style::new().underline();
    let prefix = style.prefix().to_string();
    let suffix = style.suffix().to_string();
    let mut out = String::new();
    let mut under = false;
    for (index, c) in line.char_indices() {
        let inside = column.contains(&index);
        if inside && !under {
            out.push_str(&prefix);
        } else if !inside && under {
            out.push_str(&suffix);
        }
        under = inside;
        out.push(c);
    }
    if column.start >= line.len() {
        out.push_str(&prefix);
        out.push(' ');
        under = true;
    }
    if under {
        out.push_str(&suffix);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_underline_marks_column() {
        let plain = |s: String| s.replace("\u{1b}[4m", "<").replace("\u{1b}[0m", ">");
        assert_eq!(plain(underline("1 \u{2603} 2", &(2..5))), "1 <\u{2603}> 2");
        assert_eq!(plain(underline("1 2", &(3..4))), "1 2< >");
    }

    #[test]
    fn test_enter_reports_and_keeps_stack() {
        let mut runtime = Runtime::default();
        let report = enter(&mut runtime, "1 2 p");
        assert_eq!(report, "2\n");
        let report = enter(&mut runtime, "\u{2603}");
        assert!(report.contains("SYNTAX ERROR AT 0..3"));
        assert_eq!(runtime.stack().to_string(), "[1]");
    }
}
