//! Interactive script prompt
//!
//! Connects a [`ScriptPicker`] to the terminal. Three threads take part:
//!
//! - a reader blocks on stdin and forwards raw byte chunks
//! - a resize listener pushes coalesced resize markers
//! - the controller (the caller's thread) waits on both, updates the picker
//!   and draws every frame with a single write
//!
//! Only the controller touches picker state or the output stream. The
//! terminal guard is released on every exit path before the outcome is
//! returned.

use crate::config::PickerConfig;
use crate::input::InputDecoder;
use crate::model::Script;
use crate::services::signal_handler::{resize_channel, ResizeListener};
use crate::services::terminal_modes::{terminal_size, TerminalModes};
use crate::services::time_source::RealTimeSource;
use crate::view::script_picker::{render, ListLayout, ScriptPicker, Transition};
use crossbeam_channel::{bounded, never, select, Receiver, Sender};
use std::fmt;
use std::io::{self, Read, Write};
use std::thread;

/// Bytes requested per read from the terminal.
pub const READ_BUFFER_SIZE: usize = 32;
/// Chunks the reader may queue ahead of the controller.
const INPUT_QUEUE: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptOptions {
    /// Enable SGR mouse tracking
    pub mouse: bool,
    /// Draw on the alternate screen instead of the main one
    pub alternate_screen: bool,
}

impl Default for PromptOptions {
    fn default() -> Self {
        Self {
            mouse: true,
            alternate_screen: true,
        }
    }
}

impl From<&PickerConfig> for PromptOptions {
    fn from(config: &PickerConfig) -> Self {
        Self {
            mouse: config.mouse,
            alternate_screen: config.alternate_screen,
        }
    }
}

/// How the prompt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    Selected(Script),
    /// The user pressed Escape or Ctrl-C
    Cancelled,
    /// There was nothing to choose from; the terminal was never touched
    NoScripts,
}

#[derive(Debug)]
pub enum PromptError {
    /// The terminal could not be prepared
    Setup(io::Error),
    /// Reading terminal input failed or the stream closed
    Input(io::Error),
    /// Writing a frame failed
    Output(io::Error),
}

impl fmt::Display for PromptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptError::Setup(e) => write!(f, "failed to set up terminal: {}", e),
            PromptError::Input(e) => write!(f, "failed to read terminal input: {}", e),
            PromptError::Output(e) => write!(f, "failed to draw script picker: {}", e),
        }
    }
}

impl std::error::Error for PromptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PromptError::Setup(e) | PromptError::Input(e) | PromptError::Output(e) => Some(e),
        }
    }
}

/// What the reader thread delivers to the controller.
#[derive(Debug)]
pub enum ReaderMessage {
    Chunk(Vec<u8>),
    Failed(io::Error),
}

/// Let the user pick one of `scripts` in the terminal.
pub fn show_script_prompt(
    scripts: Vec<Script>,
    options: &PromptOptions,
) -> Result<PromptOutcome, PromptError> {
    if scripts.is_empty() {
        return Ok(PromptOutcome::NoScripts);
    }

    let mut modes =
        TerminalModes::enable(options.mouse, options.alternate_screen).map_err(PromptError::Setup)?;

    let (resize_tx, resize_rx) = resize_channel();
    let listener = ResizeListener::start(resize_tx).map_err(PromptError::Setup)?;
    let input_rx = spawn_reader(io::stdin()).map_err(PromptError::Setup)?;

    let picker = ScriptPicker::new(scripts, RealTimeSource::shared());
    tracing::debug!("Script picker opened with {} scripts", picker.total());

    let mut out = io::stdout();
    let result = run_event_loop(picker, &input_rx, &resize_rx, &terminal_size, &mut out);

    drop(listener);
    modes.undo();

    match &result {
        Ok(PromptOutcome::Selected(script)) => tracing::info!("Selected script {}", script.name),
        Ok(outcome) => tracing::debug!("Script picker closed: {:?}", outcome),
        Err(e) => tracing::warn!("Script picker failed: {}", e),
    }
    result
}

/// Forward chunks read from `input` until it fails or the controller goes away.
///
/// End of input is reported as an `UnexpectedEof` failure.
pub fn spawn_reader<R: Read + Send + 'static>(mut input: R) -> io::Result<Receiver<ReaderMessage>> {
    let (tx, rx) = bounded(INPUT_QUEUE);
    thread::Builder::new()
        .name("pm-input".into())
        .spawn(move || read_loop(&mut input, &tx))?;
    Ok(rx)
}

fn read_loop<R: Read>(input: &mut R, tx: &Sender<ReaderMessage>) {
    let mut buf = [0u8; READ_BUFFER_SIZE];
    loop {
        let message = match input.read(&mut buf) {
            Ok(0) => ReaderMessage::Failed(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "terminal input closed",
            )),
            Ok(n) => ReaderMessage::Chunk(buf[..n].to_vec()),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => ReaderMessage::Failed(e),
        };
        let failed = matches!(message, ReaderMessage::Failed(_));
        if tx.send(message).is_err() || failed {
            return;
        }
    }
}

/// Drive `picker` until the user confirms, cancels, or input fails.
///
/// Draws an initial frame, then redraws after each resize marker and after
/// each input chunk that changed the picker. A pending resize is handled
/// before waiting for more input.
pub fn run_event_loop<W: Write>(
    mut picker: ScriptPicker,
    input_rx: &Receiver<ReaderMessage>,
    resize_rx: &Receiver<()>,
    size: &dyn Fn() -> (u16, u16),
    out: &mut W,
) -> Result<PromptOutcome, PromptError> {
    let mut decoder = InputDecoder::new();
    let mut resize_rx = resize_rx.clone();
    let mut layout = draw(&mut picker, size(), out)?;

    loop {
        if resize_rx.try_recv().is_ok() {
            tracing::debug!("Redrawing after resize");
            layout = draw(&mut picker, size(), out)?;
            continue;
        }

        let wake = select! {
            recv(resize_rx) -> marker => match marker {
                Ok(()) => Wake::Resize,
                Err(_) => Wake::ResizeClosed,
            },
            recv(input_rx) -> message => Wake::Input(message.ok()),
        };

        let bytes = match wake {
            Wake::Resize => {
                tracing::debug!("Redrawing after resize");
                layout = draw(&mut picker, size(), out)?;
                continue;
            }
            Wake::ResizeClosed => {
                tracing::debug!("Resize listener stopped");
                resize_rx = never();
                continue;
            }
            Wake::Input(Some(ReaderMessage::Chunk(bytes))) => bytes,
            Wake::Input(Some(ReaderMessage::Failed(e))) => return Err(PromptError::Input(e)),
            Wake::Input(None) => {
                return Err(PromptError::Input(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "input reader stopped",
                )))
            }
        };

        let mut redraw = false;
        for event in decoder.feed(&bytes) {
            match picker.handle_event(&event, &layout) {
                Transition::Redraw => redraw = true,
                Transition::Idle => {}
                Transition::Cancel => return Ok(PromptOutcome::Cancelled),
                Transition::Confirm => {
                    if let Some(script) = picker.selected_script() {
                        return Ok(PromptOutcome::Selected(script.clone()));
                    }
                }
            }
        }
        if redraw {
            layout = draw(&mut picker, size(), out)?;
        }
    }
}

/// What woke the controller up.
enum Wake {
    Resize,
    ResizeClosed,
    /// `None` when the reader thread is gone
    Input(Option<ReaderMessage>),
}

fn draw<W: Write>(
    picker: &mut ScriptPicker,
    size: (u16, u16),
    out: &mut W,
) -> Result<ListLayout, PromptError> {
    let frame = render(picker, size);
    out.write_all(frame.output.as_bytes())
        .and_then(|()| out.flush())
        .map_err(PromptError::Output)?;
    picker.commit_layout(&frame.layout);
    Ok(frame.layout)
}
