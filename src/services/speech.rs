//! Text-to-speech output through an external synthesizer

use std::sync::Mutex;
use tokio::{process::Command, runtime::Handle, sync::mpsc};
use tracing::{debug, info, warn};

/// Something that can say a sentence out loud
pub trait SpeechOutput: Send + Sync {
    /// Queue `text` for speaking. Must not block or fail the caller.
    fn speak(&self, text: &str);
}

/// Speech through an espeak-compatible command line program.
///
/// Sentences go through one worker task and are spoken in the order they
/// were queued, one at a time.
#[derive(Debug)]
pub struct CommandSpeech {
    program: String,
    voice: Option<String>,
    queue: Mutex<Option<mpsc::UnboundedSender<String>>>,
}

impl CommandSpeech {
    pub fn new(program: impl Into<String>, voice: Option<String>) -> Self {
        Self {
            program: program.into(),
            voice,
            queue: Mutex::new(None),
        }
    }

    /// Build a speaker using the first installed voice matching `preference`,
    /// falling back to the program's default voice.
    pub async fn detect(program: &str, preference: &str) -> Self {
        let voices = match list_voices(program).await {
            Ok(voices) => voices,
            Err(e) => {
                warn!("Could not list voices: {}", e);
                Vec::new()
            }
        };

        let voice = select_voice(&voices, preference);
        match &voice {
            Some(name) => info!("Using voice {}", name),
            None => info!("No voice matches {:?}, using default voice", preference),
        }

        Self::new(program, voice)
    }

    pub fn voice(&self) -> Option<&str> {
        self.voice.as_deref()
    }

    /// Sender feeding the speech worker, spawning the worker on first use
    fn ensure_worker(&self) -> Result<mpsc::UnboundedSender<String>, String> {
        let mut queue = self.queue.lock().map_err(|e| e.to_string())?;
        if let Some(tx) = queue.as_ref().filter(|tx| !tx.is_closed()) {
            return Ok(tx.clone());
        }

        let handle = Handle::try_current().map_err(|_| "no runtime available".to_string())?;
        let (tx, rx) = mpsc::unbounded_channel();
        handle.spawn(speech_worker(self.program.clone(), self.voice.clone(), rx));
        debug!("Speech worker started");

        *queue = Some(tx.clone());
        Ok(tx)
    }
}

impl SpeechOutput for CommandSpeech {
    fn speak(&self, text: &str) {
        let tx = match self.ensure_worker() {
            Ok(tx) => tx,
            Err(e) => {
                warn!("Dropping speech {:?}: {}", text, e);
                return;
            }
        };

        debug!("Queueing speech: {}", text);
        if tx.send(text.to_string()).is_err() {
            warn!("Speech worker stopped, dropping: {}", text);
        }
    }
}

/// Speak queued sentences one after another until every sender is gone
async fn speech_worker(program: String, voice: Option<String>, mut rx: mpsc::UnboundedReceiver<String>) {
    while let Some(text) = rx.recv().await {
        let mut command = Command::new(&program);
        if let Some(voice) = &voice {
            command.args(["-v", voice.as_str()]);
        }
        command.arg(&text);

        debug!("Speaking: {}", text);
        match command.output().await {
            Ok(output) if output.status.success() => {}
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                warn!("Speech program failed: {}", stderr.trim());
            }
            Err(e) => warn!("Failed to execute speech program: {}", e),
        }
    }

    debug!("Speech queue closed, worker stopping");
}

/// Run `<program> --voices` and collect the voice names
async fn list_voices(program: &str) -> Result<Vec<String>, String> {
    let output = Command::new(program)
        .arg("--voices")
        .output()
        .await
        .map_err(|e| format!("Failed to execute {} --voices: {}", program, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("{} --voices failed: {}", program, stderr));
    }

    Ok(parse_voice_list(&String::from_utf8_lossy(&output.stdout)))
}

/// Extract the VoiceName column from an espeak voice table
pub fn parse_voice_list(table: &str) -> Vec<String> {
    table
        .lines()
        .skip(1)
        .filter_map(|line| line.split_whitespace().nth(3))
        .map(str::to_string)
        .collect()
}

/// First voice whose name contains `preference`, ignoring case
pub fn select_voice(voices: &[String], preference: &str) -> Option<String> {
    let preference = preference.trim().to_lowercase();
    if preference.is_empty() {
        return None;
    }

    voices
        .iter()
        .find(|voice| voice.to_lowercase().contains(&preference))
        .cloned()
}
