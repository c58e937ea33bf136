use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use std::time::{Duration, Instant};

use crate::input::{handle_key, handle_mouse};
use crate::render::render;
use crate::ui::{App, Tui};

const TICK_INTERVAL: Duration = Duration::from_millis(50);

pub async fn run_app(terminal: &mut Tui, app: &mut App) -> Result<()> {
    let mut event_stream = EventStream::new();

    // The tick drives the hover-to-group timer and notification expiry
    let mut tick_interval = tokio::time::interval(TICK_INTERVAL);

    while app.running {
        terminal.draw(|f| render(f, app))?;

        tokio::select! {
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        handle_key(app, key, Instant::now());
                    }
                    Some(Ok(Event::Mouse(mouse))) => handle_mouse(app, mouse, Instant::now()),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::error!(error = %e, "terminal event stream failed");
                        return Err(e.into());
                    }
                    None => app.quit(),
                }
            }
            _ = tick_interval.tick() => {
                app.tick(Instant::now());
            }
        }
    }

    Ok(())
}
