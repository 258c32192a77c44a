use campaign_deploy::ConfigWarning;

use crate::ui::context::UiContext;
use crate::ui::log;

pub fn print_config_warnings(warnings: &[ConfigWarning], ui: &UiContext) {
    if ui.json {
        for w in warnings {
            let _ = crate::ui::json::emit(serde_json::json!({
                "event": "config_warning",
                "key": w.key,
                "file": w.file.display().to_string(),
                "line": w.line,
                "suggestion": w.suggestion,
            }));
        }
        return;
    }

    for w in warnings {
        let location = match w.line {
            Some(line) => format!("{}:{}", w.file.display(), line),
            None => w.file.display().to_string(),
        };
        let mut message = format!("unknown config key '{}' in {}", w.key, location);
        if let Some(suggestion) = &w.suggestion {
            message.push_str(&format!("; did you mean '{}'?", suggestion));
        }
        log::warning(ui, &message);
    }
}
