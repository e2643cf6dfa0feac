//! UCI command parsing. Anything unparseable is reported upward as
//! `Unknown` and dropped by the driver with a log line.

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GoParams {
    pub wtime: Option<u64>,
    pub btime: Option<u64>,
    pub winc: u64,
    pub binc: u64,
    pub movestogo: u32,
    pub depth: Option<u32>,
    pub movetime: Option<u64>,
    pub mate: Option<u32>,
    pub infinite: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Uci,
    IsReady,
    UciNewGame,
    Position {
        fen: Option<String>,
        moves: Vec<String>,
    },
    Go(GoParams),
    Stop,
    Quit,
    SetOption {
        name: String,
        value: Option<String>,
    },
    /// Debug helpers, outside the UCI standard but harmless.
    Eval,
    Print,
    Perft(u32),
    Unknown(String),
}

#[must_use]
pub fn parse(line: &str) -> Command {
    let mut tokens = line.split_whitespace();
    let Some(head) = tokens.next() else {
        return Command::Unknown(String::new());
    };

    match head {
        "uci" => Command::Uci,
        "isready" => Command::IsReady,
        "ucinewgame" => Command::UciNewGame,
        "position" => parse_position(&mut tokens),
        "go" => parse_go(&mut tokens),
        "stop" => Command::Stop,
        "quit" => Command::Quit,
        "setoption" => parse_setoption(&mut tokens),
        "eval" => Command::Eval,
        "print" | "d" => Command::Print,
        "perft" => {
            let depth = tokens.next().and_then(|t| t.parse().ok()).unwrap_or(1);
            Command::Perft(depth)
        }
        _ => Command::Unknown(line.to_string()),
    }
}

fn parse_position<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Command {
    let mut fen: Option<String> = None;
    match tokens.next() {
        Some("startpos") => {}
        Some("fen") => {
            // A FEN is up to six whitespace-separated fields, ending at the
            // optional `moves` keyword.
            let mut fields = Vec::new();
            for token in tokens.by_ref() {
                if token == "moves" {
                    return Command::Position {
                        fen: Some(fields.join(" ")),
                        moves: tokens.map(str::to_string).collect(),
                    };
                }
                fields.push(token);
            }
            return Command::Position {
                fen: Some(fields.join(" ")),
                moves: Vec::new(),
            };
        }
        other => {
            return Command::Unknown(format!("position {}", other.unwrap_or_default()));
        }
    }
    // startpos [moves ...]
    match tokens.next() {
        Some("moves") => Command::Position {
            fen,
            moves: tokens.map(str::to_string).collect(),
        },
        None => Command::Position {
            fen: fen.take(),
            moves: Vec::new(),
        },
        Some(other) => Command::Unknown(format!("position startpos {other}")),
    }
}

fn parse_go<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Command {
    let mut params = GoParams::default();
    while let Some(token) = tokens.next() {
        let mut next_u64 = || tokens.next().and_then(|t| t.parse::<u64>().ok());
        match token {
            "wtime" => params.wtime = next_u64(),
            "btime" => params.btime = next_u64(),
            "winc" => params.winc = next_u64().unwrap_or(0),
            "binc" => params.binc = next_u64().unwrap_or(0),
            "movestogo" => params.movestogo = next_u64().unwrap_or(0) as u32,
            "depth" => params.depth = next_u64().map(|d| d as u32),
            "movetime" => params.movetime = next_u64(),
            "mate" => params.mate = next_u64().map(|n| n as u32),
            "infinite" => params.infinite = true,
            _ => {}
        }
    }
    Command::Go(params)
}

fn parse_setoption<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Command {
    // setoption name <name with spaces> [value <value with spaces>]
    let mut name_parts: Vec<&str> = Vec::new();
    let mut value_parts: Vec<&str> = Vec::new();
    let mut mode = "";
    for token in tokens {
        match token {
            "name" => mode = "name",
            "value" => mode = "value",
            other => match mode {
                "name" => name_parts.push(other),
                "value" => value_parts.push(other),
                _ => {}
            },
        }
    }
    if name_parts.is_empty() {
        return Command::Unknown("setoption".to_string());
    }
    Command::SetOption {
        name: name_parts.join(" "),
        value: if value_parts.is_empty() {
            None
        } else {
            Some(value_parts.join(" "))
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_position_fen_with_moves() {
        let cmd = parse("position fen 8/8/8/8/8/8/8/K1k5 w - - 0 1 moves a1a2");
        assert_eq!(
            cmd,
            Command::Position {
                fen: Some("8/8/8/8/8/8/8/K1k5 w - - 0 1".to_string()),
                moves: vec!["a1a2".to_string()],
            }
        );
    }

    #[test]
    fn parses_go_clock() {
        let cmd = parse("go wtime 60000 btime 58000 winc 1000 binc 1000 movestogo 38");
        let Command::Go(p) = cmd else {
            panic!("not a go command")
        };
        assert_eq!(p.wtime, Some(60_000));
        assert_eq!(p.movestogo, 38);
        assert!(!p.infinite);
    }

    #[test]
    fn parses_setoption_with_spaces() {
        let cmd = parse("setoption name SyzygyPath value /tb/wdl files");
        assert_eq!(
            cmd,
            Command::SetOption {
                name: "SyzygyPath".to_string(),
                value: Some("/tb/wdl files".to_string()),
            }
        );
    }
}
