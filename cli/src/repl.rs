//! Interactive chat loop commands.

/// One line of interactive input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Send(String),
    New,
    Threads,
    /// `/open 3` opens the third listed thread; anything else is a thread id.
    Open(OpenTarget),
    /// `/rename <title>` renames the open conversation locally.
    Rename(String),
    Help,
    Quit,
    Empty,
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenTarget {
    Index(usize),
    ThreadId(String),
}

pub const HELP: &str = "\
Type a question and press Enter to send it.
  /threads        list conversations
  /open <n|id>    open a conversation by list number or thread id
  /new            start a new conversation
  /rename <title> rename the open conversation (this session only)
  /help           show this help
  /quit           exit
";

pub fn parse_command(line: &str) -> ReplCommand {
    let line = line.trim();
    if line.is_empty() {
        return ReplCommand::Empty;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return ReplCommand::Send(line.to_owned());
    };
    let (name, arg) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    let arg = arg.trim();
    match name {
        "quit" | "exit" | "q" => ReplCommand::Quit,
        "new" => ReplCommand::New,
        "threads" | "list" => ReplCommand::Threads,
        "help" | "?" => ReplCommand::Help,
        "open" if !arg.is_empty() => ReplCommand::Open(parse_target(arg)),
        "rename" if !arg.is_empty() => ReplCommand::Rename(arg.to_owned()),
        _ => ReplCommand::Unknown(line.to_owned()),
    }
}

/// List numbers are 1-based on screen.
fn parse_target(arg: &str) -> OpenTarget {
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => OpenTarget::Index(n - 1),
        _ => OpenTarget::ThreadId(arg.to_owned()),
    }
}

#[cfg(test)]
#[path = "repl_test.rs"]
mod repl_test;
