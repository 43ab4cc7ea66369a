//! Types a phrase on the keyboard without a window, then holds delete.
//!
//! `cargo run -p headless_typing -- "hello world"`

use anyhow::{Context, bail};
use tapboard_core::prelude::*;
use tapboard_platform::{HostOptions, KeyboardHost, init_logging};
use tapboard_ui::{DEL, KeyboardConfig, RepeatPolicy, SPACE, TextBuffer};
use web_time::{Duration, Instant};

type Host = KeyboardHost<Option<TextBuffer>>;

/// Virtual frame time; the clock only moves when we say so.
struct Frames {
    now: Instant,
}

impl Frames {
    fn step(&mut self, host: &mut Host, d: Duration) {
        self.now += d;
        host.tick(self.now);
    }
}

fn press(host: &mut Host, frames: &mut Frames, label: &str, hold: Duration) -> anyhow::Result<()> {
    let pos = host
        .key_center(label)?
        .with_context(|| format!("no key labelled {label:?}"))?;
    host.handle_pointer(PointerEvent::touch(1, PointerEventKind::Down, pos))?;
    let step = Duration::from_millis(16);
    let mut held = Duration::ZERO;
    while held < hold {
        frames.step(host, step);
        held += step;
    }
    host.handle_pointer(PointerEvent::touch(1, PointerEventKind::Up, pos))?;
    frames.step(host, step);
    Ok(())
}

fn label_for(c: char) -> anyhow::Result<String> {
    match c {
        ' ' => Ok(SPACE.to_string()),
        c if c.is_ascii_alphabetic() => Ok(c.to_ascii_uppercase().to_string()),
        other => bail!("no key for {other:?}"),
    }
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let phrase = std::env::args().nth(1).unwrap_or_else(|| "hello world".to_string());
    let policy = match std::env::args().nth(2).as_deref() {
        Some("until-release") => RepeatPolicy::UntilRelease,
        _ => RepeatPolicy::CappedByPopup,
    };

    let options = HostOptions {
        config: KeyboardConfig::default().with_repeat_policy(policy),
        ..HostOptions::default()
    };
    let mut host: Host = KeyboardHost::new(Some(TextBuffer::new()), options);
    let mut frames = Frames { now: timer::now() };

    for c in phrase.chars() {
        let label = label_for(c)?;
        press(&mut host, &mut frames, &label, Duration::from_millis(48))?;
    }
    log::info!("typed {:?}", host.editing().as_ref().map(|t| t.text.clone()));

    // Hold delete for a second.
    press(&mut host, &mut frames, DEL, Duration::from_secs(1))?;

    // Let popups settle before the final frame.
    frames.step(&mut host, Duration::from_millis(200));
    let frame = host.frame().context("compose final frame")?;
    println!("{}", frame.view.outline());

    let result = host
        .editing()
        .as_ref()
        .map(TextBuffer::with_caret)
        .unwrap_or_default();
    println!("{policy:?}: {result}");

    host.shutdown();
    Ok(())
}
