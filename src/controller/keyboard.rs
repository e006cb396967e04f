// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::io;

use tokio::{sync::mpsc::Sender, task::JoinHandle};
use tracing::{info, span, Level};

use super::Event;

/// A driver that feeds keystrokes from stdin, one key identifier per line
/// (`KeyA`, `ShiftLeft`, ...). Anything able to write key codes to the
/// process — a terminal, a pipe, an input-event bridge — can drive the
/// simulator through this.
pub struct Driver {}

impl Driver {
    pub fn new() -> Driver {
        Driver {}
    }

    /// Reads one key identifier from the reader and forwards it as an event.
    /// Returns false once the reader hits EOF.
    fn monitor_io<R>(events_tx: &Sender<Event>, mut reader: R) -> Result<bool, io::Error>
    where
        R: io::BufRead,
    {
        let mut input: String = String::default();
        if reader.read_line(&mut input)? == 0 {
            return Ok(false);
        }

        // An empty line is the space bar: it's the only key a line-oriented
        // reader can't spell any other way.
        let key_id = match input.trim() {
            "" => "Space",
            key_id => key_id,
        };

        events_tx
            .blocking_send(Event::KeyDown(key_id.to_string()))
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        Ok(true)
    }
}

impl super::Driver for Driver {
    fn monitor_events(&self, events_tx: Sender<Event>) -> JoinHandle<Result<(), io::Error>> {
        tokio::task::spawn_blocking(move || {
            let span = span!(Level::INFO, "keyboard driver");
            let _enter = span.enter();

            info!("Keyboard driver started.");

            while Self::monitor_io(&events_tx, io::stdin().lock())? {}

            info!("Keyboard driver closing.");
            Ok(())
        })
    }
}

#[cfg(test)]
mod test {
    use std::io::{self, BufReader};

    use tokio::sync::mpsc;

    use super::Driver;
    use crate::controller::Event;

    fn get_events(input: &str) -> Result<Vec<Event>, io::Error> {
        let (sender, mut receiver) = mpsc::channel::<Event>(16);

        let mut reader = BufReader::new(input.as_bytes());
        while Driver::monitor_io(&sender, &mut reader)? {}

        // Force the sender to close.
        drop(sender);

        let mut events = Vec::new();
        while let Some(event) = receiver.blocking_recv() {
            events.push(event);
        }
        Ok(events)
    }

    #[test]
    fn test_keyboard_events() -> Result<(), io::Error> {
        let events = get_events("KeyA\nShiftRight\n  Tab  \n\nSpace\n")?;

        assert_eq!(
            vec![
                Event::KeyDown("KeyA".to_string()),
                Event::KeyDown("ShiftRight".to_string()),
                Event::KeyDown("Tab".to_string()),
                Event::KeyDown("Space".to_string()),
                Event::KeyDown("Space".to_string()),
            ],
            events
        );
        Ok(())
    }

    #[test]
    fn test_keyboard_eof() -> Result<(), io::Error> {
        assert!(get_events("")?.is_empty());
        Ok(())
    }
}
