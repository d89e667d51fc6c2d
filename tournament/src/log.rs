// ═══════════════════════════════════════════════════════════════════════
// Event log — append-only text sink
//
// The engine reports events; this writes them. Appends are fire-and-forget:
// a failing write never disturbs the game that produced the line.
// ═══════════════════════════════════════════════════════════════════════

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

pub struct EventLog {
    out: Box<dyn Write + Send>,
}

impl EventLog {
    pub fn file(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(EventLog {
            out: Box::new(file),
        })
    }

    pub fn stdout() -> Self {
        EventLog {
            out: Box::new(io::stdout()),
        }
    }

    pub fn line(&mut self, line: &str) {
        let _ = writeln!(self.out, "{line}");
    }

    pub fn lines<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.line(line.as_ref());
        }
    }

    /// A multi-line block is written as-is.
    pub fn block(&mut self, block: &str) {
        let _ = write!(self.out, "{block}");
        let _ = self.out.flush();
    }
}

impl std::fmt::Debug for EventLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EventLog")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn appends_across_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gamelog.txt");
        {
            let mut log = EventLog::file(&path).unwrap();
            log.line("first");
            log.block("block line\n");
        }
        {
            let mut log = EventLog::file(&path).unwrap();
            log.lines(["second", "third"]);
        }
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "first\nblock line\nsecond\nthird\n");
    }
}
