//! Command language of the interactive shell.
//!
//! Each input line parses into a [`Command`], which is then translated into
//! the [`Event`]s it stands for. Translation needs the current state: `add 3`
//! refers to the third card of the results on screen.
//!
//! ```text
//! search pikachu          → SearchInput("pikachu"), SubmitSearch
//! add 3                   → AddToCollection { card_id: <3rd result> }
//! login ash pikachu123    → SubmitLogin(..)
//! goto /collection        → Navigate(Collection)
//! ```

use crate::app::{AppState, Event, Route};
use crate::domain::{Credentials, Registration};
use std::fmt;

/// Help text printed by `help`.
pub const HELP: &str = "\
Commands:
  search <query>                     search the card catalog
  next | prev | page <n>             change result page
  add <n>                            add result #n to your collection
  login <username> <password>        sign in
  register <username> <password> [email]
                                     create an account
  logout                             sign out
  home | collection | goto <path>    switch screens (/ /collection /login /register)
  refresh                            reload the collection (or your collection list)
  health                             check the backend
  help                               show this help
  quit                               exit";

/// A parsed shell command.
#[derive(Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Page(u32),
    Next,
    Prev,
    Add(usize),
    Login { username: String, password: String },
    Register {
        username: String,
        password: String,
        email: Option<String>,
    },
    Logout,
    Goto(Route),
    Refresh,
    Health,
    Help,
    Quit,
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login { username, .. } => f
                .debug_struct("Login")
                .field("username", username)
                .finish_non_exhaustive(),
            Self::Register { username, .. } => f
                .debug_struct("Register")
                .field("username", username)
                .finish_non_exhaustive(),
            Self::Search(query) => f.debug_tuple("Search").field(query).finish(),
            Self::Page(page) => f.debug_tuple("Page").field(page).finish(),
            Self::Add(position) => f.debug_tuple("Add").field(position).finish(),
            Self::Goto(route) => f.debug_tuple("Goto").field(route).finish(),
            Self::Next => f.write_str("Next"),
            Self::Prev => f.write_str("Prev"),
            Self::Logout => f.write_str("Logout"),
            Self::Refresh => f.write_str("Refresh"),
            Self::Health => f.write_str("Health"),
            Self::Help => f.write_str("Help"),
            Self::Quit => f.write_str("Quit"),
        }
    }
}

impl Command {
    /// Parses one input line. Blank lines yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns a usage message for unknown commands or missing arguments.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(word, rest)| (word, rest.trim()));
        let args: Vec<&str> = rest.split_whitespace().collect();

        let command = match word.to_ascii_lowercase().as_str() {
            "" => return Ok(None),
            "search" | "s" => Self::Search(rest.to_string()),
            "next" | "n" => Self::Next,
            "prev" | "p" => Self::Prev,
            "page" => Self::Page(parse_number(args.first(), "page <n>")?),
            "add" | "a" => Self::Add(parse_number(args.first(), "add <n>")?),
            "login" => match args.as_slice() {
                [username, password] => Self::Login {
                    username: (*username).to_string(),
                    password: (*password).to_string(),
                },
                _ => return Err("usage: login <username> <password>".to_string()),
            },
            "register" => match args.as_slice() {
                [username, password] => Self::Register {
                    username: (*username).to_string(),
                    password: (*password).to_string(),
                    email: None,
                },
                [username, password, email] => Self::Register {
                    username: (*username).to_string(),
                    password: (*password).to_string(),
                    email: Some((*email).to_string()),
                },
                _ => return Err("usage: register <username> <password> [email]".to_string()),
            },
            "logout" => Self::Logout,
            "home" => Self::Goto(Route::Home),
            "collection" | "c" => Self::Goto(Route::Collection),
            "goto" => {
                let path = args.first().copied().unwrap_or("/");
                let route = Route::from_path(path)
                    .ok_or_else(|| format!("unknown location: {path}"))?;
                Self::Goto(route)
            }
            "refresh" | "r" => Self::Refresh,
            "health" => Self::Health,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(format!("unknown command: {other} (try `help`)")),
        };

        Ok(Some(command))
    }

    /// Translates the command into events for the current state.
    ///
    /// `Help` and `Quit` are handled by the shell itself and yield no events.
    ///
    /// # Errors
    ///
    /// Returns a message when the command refers to something not on screen,
    /// such as a result number outside the current page.
    pub fn into_events(self, state: &AppState) -> Result<Vec<Event>, String> {
        let events = match self {
            Self::Search(query) => {
                let mut events = vec![];
                if state.route != Route::Home {
                    events.push(Event::Navigate(Route::Home));
                }
                events.push(Event::SearchInput(query));
                events.push(Event::SubmitSearch);
                events
            }
            Self::Page(page) => vec![Event::ChangePage(page)],
            Self::Next => vec![Event::ChangePage(state.search.page.saturating_add(1))],
            Self::Prev => vec![Event::ChangePage(state.search.page.saturating_sub(1))],
            Self::Add(position) => {
                let card = state
                    .result_at(position)
                    .ok_or_else(|| format!("No card #{position} in the current results"))?;
                vec![Event::AddToCollection {
                    card_id: card.id.clone(),
                }]
            }
            Self::Login { username, password } => {
                vec![Event::SubmitLogin(Credentials::new(username, password))]
            }
            Self::Register {
                username,
                password,
                email,
            } => vec![Event::SubmitRegister(Registration::new(
                username, email, password,
            ))],
            Self::Logout => vec![Event::Logout],
            Self::Goto(route) => vec![Event::Navigate(route)],
            Self::Refresh => {
                if state.route == Route::Collection {
                    vec![Event::RefreshCollection]
                } else {
                    vec![Event::RefreshCollections]
                }
            }
            Self::Health => vec![Event::CheckHealth],
            Self::Help | Self::Quit => vec![],
        };
        Ok(events)
    }
}

fn parse_number<T: std::str::FromStr>(arg: Option<&&str>, usage: &str) -> Result<T, String> {
    arg.and_then(|value| value.parse().ok())
        .ok_or_else(|| format!("usage: {usage}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::handle_event;
    use crate::ui::Theme;

    #[test]
    fn parses_commands_and_arguments() {
        assert_eq!(
            Command::parse("search  base set pikachu ").unwrap(),
            Some(Command::Search("base set pikachu".to_string()))
        );
        assert_eq!(Command::parse("add 3").unwrap(), Some(Command::Add(3)));
        assert_eq!(
            Command::parse("goto /collection").unwrap(),
            Some(Command::Goto(Route::Collection))
        );
        assert_eq!(Command::parse("   ").unwrap(), None);
        assert!(Command::parse("add three").is_err());
        assert!(Command::parse("login ash").is_err());
        assert!(Command::parse("goto /nowhere").is_err());
        assert!(Command::parse("dance").is_err());
    }

    #[test]
    fn debug_hides_passwords() {
        let command = Command::parse("login ash hunter2").unwrap().unwrap();
        assert!(!format!("{command:?}").contains("hunter2"));
    }

    #[test]
    fn add_refers_to_results_on_screen() {
        let mut state = AppState::new(20, Theme::plain());
        handle_event(&mut state, &Event::Start { persisted: None }).unwrap();

        let err = Command::Add(1).into_events(&state).unwrap_err();
        assert!(err.contains("No card #1"));
    }

    #[test]
    fn search_from_another_screen_goes_home_first() {
        let mut state = AppState::new(20, Theme::plain());
        handle_event(&mut state, &Event::Start { persisted: None }).unwrap();
        handle_event(&mut state, &Event::Navigate(Route::Login)).unwrap();

        let events = Command::Search("mew".to_string()).into_events(&state).unwrap();
        assert_eq!(
            events,
            vec![
                Event::Navigate(Route::Home),
                Event::SearchInput("mew".to_string()),
                Event::SubmitSearch
            ]
        );
    }
}
