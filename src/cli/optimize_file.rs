//! One-shot optimisation of a source file.

use std::io::{self, Write};

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use optiview::ai::{CompletionService, YandexGptService};
use optiview::diff::diff_texts;
use optiview::{OptimizeError, OptimizeRequest, OptiviewConfig, optimize_code};

use super::output::{write_report_json, write_report_text};

/// Runs file mode against the configured generator.
///
/// # Errors
///
/// Returns an error if the source cannot be read, the optimisation call
/// fails, or writing output fails.
pub fn run(config: &OptiviewConfig) -> Result<(), OptimizeError> {
    let source_path = Utf8Path::new(config.require_source()?);
    let code = read_source(source_path)?;
    let service = YandexGptService::new(config.generator_config());
    let stdout = io::stdout();
    let mut writer = stdout.lock();

    run_with_service(&mut writer, config, &code, &service)
}

fn run_with_service<W: Write>(
    writer: &mut W,
    config: &OptiviewConfig,
    code: &str,
    service: &dyn CompletionService,
) -> Result<(), OptimizeError> {
    let request = OptimizeRequest::new(
        code,
        config.target(),
        config.context.clone().unwrap_or_default(),
    );
    let report = optimize_code(service, &request)?;

    if config.json {
        write_report_json(writer, &report)
    } else {
        let comparison = diff_texts(code, &report.optimized_code);
        write_report_text(writer, &report, &comparison)
    }
}

/// Reads a UTF-8 source file relative to the current directory, or from
/// the filesystem root when `path` is absolute.
fn read_source(path: &Utf8Path) -> Result<String, OptimizeError> {
    let file_name = path.file_name().ok_or_else(|| OptimizeError::Io {
        message: format!("invalid source path '{path}': no file name"),
    })?;
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));

    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|error| {
        OptimizeError::Io {
            message: format!("failed to open source directory '{parent}': {error}"),
        }
    })?;
    dir.read_to_string(file_name)
        .map_err(|error| OptimizeError::Io {
            message: format!("failed to read source file '{path}': {error}"),
        })
}

#[cfg(test)]
mod tests {
    use camino::Utf8PathBuf;
    use optiview::OptiviewConfig;
    use optiview::ai::test_support::StubCompletionService;
    use optiview::error::OptimizeError;
    use rstest::{fixture, rstest};

    use super::{read_source, run_with_service};

    #[fixture]
    fn base_config() -> OptiviewConfig {
        OptiviewConfig {
            source: Some("main.cpp".to_owned()),
            ..OptiviewConfig::default()
        }
    }

    #[rstest]
    fn run_with_service_prints_text_report(base_config: OptiviewConfig) {
        let service = StubCompletionService::answering("```cpp\nint ab;\n```", "- Merged");
        let mut output = Vec::new();

        let result = run_with_service(&mut output, &base_config, "int a;\nint b;", &service);

        assert!(result.is_ok(), "file mode should succeed: {result:?}");
        let output_text = String::from_utf8(output).unwrap_or_default();
        assert!(output_text.starts_with("Optimized code:\nint ab;\n"));
        assert!(output_text.contains("   1  -int a; || +int ab;"));
        assert!(output_text.ends_with("Comments:\n- Merged\n"));
    }

    #[rstest]
    fn run_with_service_prints_json_when_requested(mut base_config: OptiviewConfig) {
        base_config.json = true;
        base_config.context = Some("Speed up parsing".to_owned());
        let service = StubCompletionService::answering("int a;", "");
        let mut output = Vec::new();

        run_with_service(&mut output, &base_config, "int a;", &service)
            .expect("file mode should succeed");

        let value: serde_json::Value =
            serde_json::from_slice(&output).expect("output should be JSON");
        assert_eq!(value["optimizedcode"], "int a;");
        assert_eq!(value["comments"][0], "Task: Speed up parsing...");
    }

    #[rstest]
    fn run_with_service_propagates_generator_failure(base_config: OptiviewConfig) {
        let service = StubCompletionService::failing(OptimizeError::Api {
            message: "status 401".to_owned(),
        });
        let mut output = Vec::new();

        let result = run_with_service(&mut output, &base_config, "int a;", &service);

        assert!(matches!(result, Err(OptimizeError::Api { .. })));
        assert!(output.is_empty(), "nothing should be printed on failure");
    }

    #[rstest]
    fn read_source_loads_file_by_absolute_path() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let path = Utf8PathBuf::from_path_buf(temp.path().join("main.cpp"))
            .expect("temp path should be UTF-8");
        std::fs::write(&path, "int main() {}\n").expect("fixture should be written");

        let code = read_source(&path).expect("source should be readable");

        assert_eq!(code, "int main() {}\n");
    }

    #[rstest]
    fn read_source_reports_missing_file() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let path = Utf8PathBuf::from_path_buf(temp.path().join("missing.cpp"))
            .expect("temp path should be UTF-8");

        let result = read_source(&path);

        assert!(
            matches!(result, Err(OptimizeError::Io { ref message }) if message.contains("missing.cpp")),
            "unexpected result {result:?}"
        );
    }
}
