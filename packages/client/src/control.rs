//! Line commands of the interactive control panel.

use merlinfest_server::domain::{ParametersPatch, VisualStatePatch};
use thiserror::Error;

pub const HELP: &str = "\
Commands:
  theme <name>         change the theme for everyone
  effect <id>          fire a one-shot effect
  speed <number>       set the animation speed
  intensity <number>   set the intensity
  color <scheme>       set the color scheme
  effects [a,b,...]    replace the active effect list
  state                show the local visual state
  help                 show this help
  quit                 disconnect and exit
";

/// A parsed control panel command.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlCommand {
    ChangeTheme(String),
    TriggerEffect(String),
    UpdateVisuals(VisualStatePatch),
    ShowState,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlParseError {
    #[error("Unknown command '{0}' (type 'help')")]
    UnknownCommand(String),

    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),

    #[error("'{0}' is not a number")]
    InvalidNumber(String),
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<ControlCommand>, ControlParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    let command = match name {
        "theme" => ControlCommand::ChangeTheme(required("theme", rest)?.to_string()),
        "effect" => ControlCommand::TriggerEffect(required("effect", rest)?.to_string()),
        "speed" => parameters(ParametersPatch {
            speed: Some(number(required("speed", rest)?)?),
            ..Default::default()
        }),
        "intensity" => parameters(ParametersPatch {
            intensity: Some(number(required("intensity", rest)?)?),
            ..Default::default()
        }),
        "color" => parameters(ParametersPatch {
            color_scheme: Some(required("color", rest)?.to_string()),
            ..Default::default()
        }),
        "effects" => parameters(ParametersPatch {
            effect_ids: Some(
                rest.split(',')
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            ..Default::default()
        }),
        "state" => ControlCommand::ShowState,
        "help" => ControlCommand::Help,
        "quit" | "exit" => ControlCommand::Quit,
        other => return Err(ControlParseError::UnknownCommand(other.to_string())),
    };

    Ok(Some(command))
}

fn parameters(patch: ParametersPatch) -> ControlCommand {
    ControlCommand::UpdateVisuals(VisualStatePatch::parameters(patch))
}

fn required<'a>(command: &'static str, rest: &'a str) -> Result<&'a str, ControlParseError> {
    if rest.is_empty() {
        Err(ControlParseError::MissingArgument(command))
    } else {
        Ok(rest)
    }
}

fn number(value: &str) -> Result<f64, ControlParseError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| ControlParseError::InvalidNumber(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_theme_and_effect() {
        // テスト項目: theme / effect コマンドが引数付きで解釈される
        // given (前提条件):

        // when (操作):
        let theme = parse_command("theme  Cosmic Merlin ");
        let effect = parse_command("effect sparkle");

        // then (期待する結果):
        assert_eq!(
            theme,
            Ok(Some(ControlCommand::ChangeTheme("Cosmic Merlin".to_string())))
        );
        assert_eq!(
            effect,
            Ok(Some(ControlCommand::TriggerEffect("sparkle".to_string())))
        );
    }

    #[test]
    fn test_parse_parameter_commands_build_partial_patches() {
        // テスト項目: パラメータ系コマンドは該当フィールドだけを持つパッチになる
        // given (前提条件):

        // when (操作):
        let speed = parse_command("speed 80");
        let effects = parse_command("effects stars, nebula,,wizard-cat");

        // then (期待する結果):
        assert_eq!(
            speed,
            Ok(Some(ControlCommand::UpdateVisuals(VisualStatePatch::parameters(
                ParametersPatch {
                    speed: Some(80.0),
                    ..Default::default()
                }
            ))))
        );
        assert_eq!(
            effects,
            Ok(Some(ControlCommand::UpdateVisuals(VisualStatePatch::parameters(
                ParametersPatch {
                    effect_ids: Some(vec![
                        "stars".to_string(),
                        "nebula".to_string(),
                        "wizard-cat".to_string()
                    ]),
                    ..Default::default()
                }
            ))))
        );
    }

    #[test]
    fn test_parse_effects_without_argument_clears_list() {
        // テスト項目: 引数なしの effects はエフェクト一覧を空にする
        // given (前提条件):

        // when (操作):
        let result = parse_command("effects");

        // then (期待する結果):
        assert_eq!(
            result,
            Ok(Some(ControlCommand::UpdateVisuals(VisualStatePatch::parameters(
                ParametersPatch {
                    effect_ids: Some(Vec::new()),
                    ..Default::default()
                }
            ))))
        );
    }

    #[test]
    fn test_parse_errors() {
        // テスト項目: 不正な入力はエラーになり、空行は無視される
        // given (前提条件):

        // when (操作):
        let blank = parse_command("   ");
        let missing = parse_command("theme");
        let invalid = parse_command("speed fast");
        let infinite = parse_command("intensity inf");
        let unknown = parse_command("dance");

        // then (期待する結果):
        assert_eq!(blank, Ok(None));
        assert_eq!(missing, Err(ControlParseError::MissingArgument("theme")));
        assert_eq!(invalid, Err(ControlParseError::InvalidNumber("fast".to_string())));
        assert_eq!(infinite, Err(ControlParseError::InvalidNumber("inf".to_string())));
        assert_eq!(unknown, Err(ControlParseError::UnknownCommand("dance".to_string())));
    }

    #[test]
    fn test_parse_quit_aliases() {
        // テスト項目: quit と exit はどちらも終了コマンドになる
        // given (前提条件):

        // when (操作):
        let quit = parse_command("quit");
        let exit = parse_command("exit");

        // then (期待する結果):
        assert_eq!(quit, Ok(Some(ControlCommand::Quit)));
        assert_eq!(exit, Ok(Some(ControlCommand::Quit)));
    }
}
