//! Day planning: a short conversation turned into a time-blocked `## Plan`
//! section for today's daily note.

pub mod prompts;

use chrono::NaiveDate;

use crate::dialogue::Script;
use crate::error::Result;
use crate::note::{format_transcript, ConversationMessage};
use crate::oracle::Oracle;
use crate::text::truncate_chars;
use crate::weather::WeatherInfo;

pub const SYNTHESIZE_MAX_TOKENS: u32 = 2000;

/// Conversation script, with today's weather and daily note folded into the
/// system prompt when available
pub fn script(weather: Option<&WeatherInfo>, existing_note: Option<&str>) -> Script {
    let mut system_prompt = prompts::SYSTEM_PROMPT.to_string();
    if let Some(weather) = weather {
        system_prompt.push_str("\n\n");
        system_prompt.push_str(&conversation_weather_context(weather));
    }
    if let Some(existing) = existing_note.map(str::trim).filter(|s| !s.is_empty()) {
        system_prompt.push_str("\n\n");
        system_prompt.push_str(&existing_note_context(existing));
    }

    Script {
        speaker: prompts::SPEAKER.to_string(),
        system_prompt,
        opening_question: prompts::OPENING_QUESTION.to_string(),
        done_message: prompts::DONE_MESSAGE.to_string(),
        wrap_up_message: prompts::WRAP_UP_MESSAGE.to_string(),
    }
}

fn conversation_weather_context(weather: &WeatherInfo) -> String {
    format!(
        "Weather context for today (use it to time outdoor activity):\n\
         {}\n\
         Best outdoor window: {}\n\
         Sunrise: {}, Sunset: {}\n\n\
         The user lives in the midwest and values getting outside when the weather is good. \
         If conditions are favorable, suggest shifting indoor work to make room for outdoor \
         time in the best window. If the weather is poor, suggest indoor workout alternatives.",
        weather.summary, weather.best_outdoor_window, weather.sunrise, weather.sunset
    )
}

fn existing_note_context(existing: &str) -> String {
    format!(
        "The user already has content in today's daily note:\n\n\
         {}\n\n\
         Use anything relevant there (tasks already noted, agenda items) when building the \
         plan. Do not ask about things already captured.",
        truncate_chars(existing, prompts::EXISTING_NOTE_CHARS)
    )
}

/// Weather block for the synthesis prompt; empty without a forecast
fn synthesis_weather_context(weather: Option<&WeatherInfo>) -> String {
    let Some(w) = weather else {
        return String::new();
    };
    format!(
        "Weather for today:\n\
         - Conditions: {}\n\
         - High: {:.0}F, Low: {:.0}F\n\
         - Precipitation chance: {:.0}%\n\
         - Wind: {:.0} mph\n\
         - Best outdoor window: {}\n\
         - Sunrise: {}, Sunset: {}",
        w.condition,
        w.temperature_high_f,
        w.temperature_low_f,
        w.precipitation_chance,
        w.wind_speed_mph,
        w.best_outdoor_window,
        w.sunrise,
        w.sunset
    )
}

fn synthesis_system(weather: Option<&WeatherInfo>) -> String {
    format!(
        "{}\n\n{}\n\n{}",
        prompts::SYNTHESIZE_SYSTEM_HEAD,
        synthesis_weather_context(weather),
        prompts::SYNTHESIZE_SYSTEM_TAIL
    )
}

/// Turn a planning conversation into plan markdown
#[tracing::instrument(skip(oracle, transcript, weather), fields(turns = transcript.len()))]
pub fn synthesize_plan(
    oracle: &dyn Oracle,
    transcript: &[ConversationMessage],
    weather: Option<&WeatherInfo>,
    date: NaiveDate,
) -> Result<String> {
    let request = format!(
        "Date: {}\n\nConversation transcript:\n\n{}",
        date.format("%Y-%m-%d"),
        format_transcript(transcript)
    );
    let plan = oracle.complete(
        &synthesis_system(weather),
        &[ConversationMessage::user(request)],
        SYNTHESIZE_MAX_TOKENS,
    )?;
    Ok(plan.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::testing::ScriptedOracle;

    fn sunny() -> WeatherInfo {
        WeatherInfo {
            temperature_high_f: 72.4,
            temperature_low_f: 51.0,
            condition: "Clear sky".to_string(),
            precipitation_chance: 10.0,
            wind_speed_mph: 8.2,
            sunrise: "06:41".to_string(),
            sunset: "19:02".to_string(),
            best_outdoor_window: "14:00-16:00".to_string(),
            summary: "Clear sky, high 72F / low 51F, 10% chance of rain, wind 8 mph"
                .to_string(),
        }
    }

    #[test]
    fn test_script_without_context() {
        let script = script(None, None);
        assert_eq!(script.system_prompt, prompts::SYSTEM_PROMPT);
        assert_eq!(script.speaker, "Plan Assistant");
        assert!(script.opening_question.starts_with("Let's plan your day."));
    }

    #[test]
    fn test_script_with_weather_and_note() {
        let weather = sunny();
        let long_note = format!("- [ ] call the bank\n{}", "x".repeat(5000));
        let script = script(Some(&weather), Some(&long_note));

        assert!(script.system_prompt.starts_with(prompts::SYSTEM_PROMPT));
        assert!(script.system_prompt.contains(&weather.summary));
        assert!(script.system_prompt.contains("Best outdoor window: 14:00-16:00"));
        assert!(script.system_prompt.contains("Sunrise: 06:41, Sunset: 19:02"));
        assert!(script.system_prompt.contains("call the bank"));
        assert!(!script.system_prompt.contains(&"x".repeat(2000)));
    }

    #[test]
    fn test_blank_existing_note_is_ignored() {
        let script = script(None, Some("  \n"));
        assert_eq!(script.system_prompt, prompts::SYSTEM_PROMPT);
    }

    #[test]
    fn test_synthesize_plan() {
        let oracle = ScriptedOracle::replying(["\n## Plan\n\n### Schedule\n- **09:00 - 10:00** | Email [LOW]\n\n"]);
        let transcript = vec![
            ConversationMessage::assistant("What's on your plate?"),
            ConversationMessage::user("Email and a run"),
        ];
        let weather = sunny();
        let date = NaiveDate::from_ymd_opt(2026, 5, 4).unwrap();

        let plan = synthesize_plan(&oracle, &transcript, Some(&weather), date).unwrap();
        assert!(plan.starts_with("## Plan"));
        assert!(plan.ends_with("[LOW]"));

        let calls = oracle.calls();
        assert_eq!(calls[0].max_tokens, SYNTHESIZE_MAX_TOKENS);
        assert!(calls[0].system.contains("- High: 72F, Low: 51F"));
        assert!(calls[0].system.contains("- Precipitation chance: 10%"));
        assert!(calls[0].system.contains("- Wind: 8 mph"));
        assert!(calls[0].system.ends_with(prompts::SYNTHESIZE_SYSTEM_TAIL));
        assert_eq!(
            calls[0].messages[0].content,
            "Date: 2026-05-04\n\nConversation transcript:\n\nAssistant: What's on your plate?\n\nUser: Email and a run"
        );
    }

    #[test]
    fn test_synthesis_without_weather_omits_block() {
        let oracle = ScriptedOracle::replying(["## Plan"]);
        let date = NaiveDate::from_ymd_opt(2026, 5, 4).unwrap();
        synthesize_plan(&oracle, &[ConversationMessage::user("errands")], None, date).unwrap();
        assert!(!oracle.calls()[0].system.contains("Weather for today"));
    }
}
