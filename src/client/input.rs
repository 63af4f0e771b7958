/// One line typed by the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Nick(String),
    Join(String),
    Msg { target: String, text: String },
    Quit,
    Help,
    Clear,
    Empty,
    MsgUsage,
    Unknown,
}

pub const QUIT_LINE: &str = "QUIT :Goodbye!\r\n";

pub const HELP: &[&str] = &[
    "=== commands ===",
    "/nick <name>          set your nickname",
    "/join <#channel>      join a channel",
    "/msg <target> <text>  send a message",
    "/quit                 leave",
    "/clear                clear the screen",
    "/help                 show this help",
];

fn argument<'a>(line: &'a str, command: &str) -> Option<&'a str> {
    line.strip_prefix(command).filter(|rest| !rest.is_empty())
}

impl Input {
    pub fn parse(line: &str) -> Input {
        let line = line.trim_end_matches(|c| c == '\r' || c == '\n');

        match line {
            "" => return Input::Empty,
            "/quit" => return Input::Quit,
            "/help" => return Input::Help,
            "/clear" => return Input::Clear,
            _ => {}
        }

        if let Some(nick) = argument(line, "/nick ") {
            return Input::Nick(nick.to_string());
        }

        if let Some(channel) = argument(line, "/join ") {
            return Input::Join(channel.to_string());
        }

        if let Some(rest) = argument(line, "/msg ") {
            return match rest.find(' ') {
                Some(i) => Input::Msg {
                    target: rest[..i].to_string(),
                    text: rest[i + 1..].to_string(),
                },
                None => Input::MsgUsage,
            };
        }

        Input::Unknown
    }

    /// The protocol line this input sends, if any.
    pub fn to_wire(&self) -> Option<String> {
        match self {
            Input::Nick(nick) => Some(format!("NICK {}\r\n", nick)),
            Input::Join(channel) if channel.starts_with('#') => {
                Some(format!("JOIN {}\r\n", channel))
            }
            Input::Join(channel) => Some(format!("JOIN #{}\r\n", channel)),
            Input::Msg { target, text } => Some(format!("PRIVMSG {} :{}\r\n", target, text)),
            Input::Quit => Some(QUIT_LINE.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("/nick alice", "NICK alice\r\n" ; "nick")]
    #[test_case("/join test", "JOIN #test\r\n" ; "join adds hash")]
    #[test_case("/join #test", "JOIN #test\r\n" ; "join keeps hash")]
    #[test_case("/msg #test hi there", "PRIVMSG #test :hi there\r\n" ; "msg splits at first space")]
    #[test_case("/quit", "QUIT :Goodbye!\r\n" ; "quit")]
    fn input_to_wire(line: &str, expected: &str) {
        assert_eq!(Some(expected.to_string()), Input::parse(line).to_wire());
    }

    #[test_case("", Input::Empty ; "empty")]
    #[test_case("/help", Input::Help ; "help")]
    #[test_case("/clear", Input::Clear ; "clear")]
    #[test_case("/msg bob", Input::MsgUsage ; "msg without text")]
    #[test_case("/nick ", Input::Unknown ; "nick without name")]
    #[test_case("/nick", Input::Unknown ; "bare nick")]
    #[test_case("hello", Input::Unknown ; "plain text")]
    fn input_local_only(line: &str, expected: Input) {
        let input = Input::parse(line);
        assert_eq!(expected, input);
        assert_eq!(None, input.to_wire());
    }
}
