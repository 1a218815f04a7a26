/// One line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Submit a catalog search (or filter the watchlist).
    Search(String),
    /// Live-typed filter text; only the watchlist reacts to it.
    Type(String),
    Next,
    Refresh,
    Shows,
    Watchlist,
    Open(usize),
    Toggle,
    Delete(usize),
    Back,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  search <text>   search the catalog (filters the watchlist when viewing it)
  type <text>     set the watchlist filter as you type
  next            load the next page of results
  refresh         run the last search again
  shows           back to search results
  watchlist       show your watchlist
  open <n>        show details for row n
  toggle          add/remove the open show to/from the watchlist
  delete <n>      remove watchlist row n
  back            close the detail view
  help            this text
  quit            exit";

pub fn parse(line: &str) -> Result<Input, String> {
    let line = line.trim();
    let (cmd, rest) = match line.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (line, ""),
    };

    let input = match cmd.to_ascii_lowercase().as_str() {
        "search" | "s" => Input::Search(rest.to_string()),
        "type" | "t" => Input::Type(rest.to_string()),
        "next" | "n" => Input::Next,
        "refresh" | "r" => Input::Refresh,
        "shows" => Input::Shows,
        "watchlist" | "w" => Input::Watchlist,
        "open" | "o" => Input::Open(row(rest)?),
        "toggle" => Input::Toggle,
        "delete" | "d" => Input::Delete(row(rest)?),
        "back" | "b" => Input::Back,
        "help" | "?" | "" => Input::Help,
        "quit" | "q" | "exit" => Input::Quit,
        other => return Err(format!("unknown command `{other}` (try `help`)")),
    };
    Ok(input)
}

fn row(arg: &str) -> Result<usize, String> {
    arg.parse()
        .map_err(|_| format!("expected a row number, got `{arg}`"))
}
