//! Пример использования chat-tts
//!
//! Настройки берутся из переменных окружения `TTS_*`:
//!
//! ```text
//! TTS_ENABLED=true TTS_API_URL=https://tts.example/api TTS_API_TOKEN=... \
//!     cargo run --example speak -- alice "Привет, СБ! Код 1.5"
//! ```

use anyhow::{bail, Context, Result};
use chat_tts::text::sanitize;
use chat_tts::{SpeechMode, TtsConfig, TtsSystem};

#[tokio::main]
async fn main() -> Result<()> {
    // Инициализируем логирование
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let speaker = args.next().context("usage: speak <speaker> <text> [output.ogg]")?;
    let text = args.next().context("usage: speak <speaker> <text> [output.ogg]")?;
    let output = args.next().unwrap_or_else(|| "speech.ogg".to_string());

    let config = TtsConfig::from_env().context("invalid TTS configuration")?;
    let system = TtsSystem::new(config)?;

    println!("Текст для синтеза: {}", sanitize(&text));

    let Some(audio) = system.generate(&text, &speaker, SpeechMode::Say).await else {
        bail!("speech was not generated, see logs for details");
    };

    tokio::fs::write(&output, &audio)
        .await
        .with_context(|| format!("failed to write {}", output))?;
    println!("Записано {} байт в {}", audio.len(), output);

    let metrics = system.metrics();
    println!(
        "Запрошено: {}, из кэша: {}, ограничено API: {}",
        metrics.requested, metrics.served_from_cache, metrics.rate_limited
    );

    Ok(())
}
