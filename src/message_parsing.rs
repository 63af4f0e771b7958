use std::str::FromStr;

use crate::error::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Nick { nick: String },
    Join { channel: String },
    PrivMsg { target: String, text: String },
    Unhandled,
}

/// One line received from a connection, tagged with who sent it.
#[derive(Debug, Clone)]
pub struct Message {
    pub connection_id: uuid::Uuid,
    pub command: Command,
}

/*
Recognition is by exact, case-sensitive prefix (keyword plus one space):

NICK <nick>
JOIN <channel>
PRIVMSG <target> <text>

PRIVMSG splits at the first space after the target, a single leading ':' on
the text is the trailing-parameter marker and is not part of the text.
Anything else, QUIT included, is Unhandled.
*/
impl FromStr for Command {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim_end_matches(|c| c == '\r' || c == '\n');

        if line.is_empty() {
            return Err(Error::MessageParsingErrorMissingCommand);
        }

        if let Some(nick) = line.strip_prefix("NICK ") {
            return Ok(Command::Nick {
                nick: nick.to_string(),
            });
        }

        if let Some(channel) = line.strip_prefix("JOIN ") {
            return Ok(Command::Join {
                channel: channel.to_string(),
            });
        }

        if let Some(rest) = line.strip_prefix("PRIVMSG ") {
            let (target, text) = match rest.find(' ') {
                Some(i) => (&rest[..i], &rest[i + 1..]),
                None => {
                    return Err(Error::MessageParsingErrorMissingParameter {
                        param_name: "text".to_string(),
                    })
                }
            };

            let text = text.strip_prefix(':').unwrap_or(text);

            return Ok(Command::PrivMsg {
                target: target.to_string(),
                text: text.to_string(),
            });
        }

        Ok(Command::Unhandled)
    }
}
