use std::fmt::Display;

#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Nick {
        nick: String,
    },
    Join {
        nick: String,
        channel: String,
    },
    PrivMsg {
        nick: String,
        target: String,
        text: String,
    },
}

impl Reply {
    /// The reply as it goes on the wire, CRLF terminated.
    pub fn to_line(&self) -> String {
        format!("{}\r\n", self)
    }
}

impl Display for Reply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reply::Nick { nick } => write!(f, ":{} NICK :{}", nick, nick),
            Reply::Join { nick, channel } => write!(f, ":{} JOIN {}", nick, channel),
            Reply::PrivMsg { nick, target, text } => {
                write!(f, ":{} PRIVMSG {} :{}", nick, target, text)
            }
        }
    }
}

#[test]
fn nick_prints_correctly() {
    let reply = Reply::Nick {
        nick: "alice".to_string(),
    };
    assert_eq!(":alice NICK :alice\r\n", reply.to_line());
}

#[test]
fn join_emptynick_prints_correctly() {
    let reply = Reply::Join {
        nick: "".to_string(),
        channel: "#foo".to_string(),
    };
    assert_eq!(": JOIN #foo\r\n", reply.to_line());
}

#[test]
fn privmsg_prints_correctly() {
    let reply = Reply::PrivMsg {
        nick: "alice".to_string(),
        target: "#test".to_string(),
        text: "hi there".to_string(),
    };
    assert_eq!(":alice PRIVMSG #test :hi there", reply.to_string());
}
