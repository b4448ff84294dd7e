use crate::error::ConfigError;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;

/// 程序配置
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// 试卷文件或包含多个 TOML 试卷的目录
    pub exam_path: PathBuf,
    /// 输出目录
    pub output_dir: PathBuf,
    /// 答题横线长度（字符数）
    pub answer_line_width: usize,
    /// 最大嵌套深度（顶层为 1）
    pub max_nesting_depth: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 学生卷文件名后缀
    pub student_suffix: String,
    /// 答案卷文件名后缀
    pub answer_key_suffix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exam_path: PathBuf::from("exam.toml"),
            output_dir: PathBuf::from("output"),
            answer_line_width: 80,
            max_nesting_depth: 3,
            verbose_logging: false,
            student_suffix: "Klausur".to_string(),
            answer_key_suffix: "Musterloesung".to_string(),
        }
    }
}

impl Config {
    /// 从环境变量读取配置，无法解析的值回退到默认值
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            exam_path: std::env::var("EXAM_FILE").map(PathBuf::from).unwrap_or(default.exam_path),
            output_dir: std::env::var("OUTPUT_DIR").map(PathBuf::from).unwrap_or(default.output_dir),
            answer_line_width: env_or("ANSWER_LINE_WIDTH", default.answer_line_width),
            max_nesting_depth: env_or("MAX_NESTING_DEPTH", default.max_nesting_depth),
            verbose_logging: env_or("VERBOSE_LOGGING", default.verbose_logging),
            student_suffix: std::env::var("STUDENT_SUFFIX").unwrap_or(default.student_suffix),
            answer_key_suffix: std::env::var("ANSWER_KEY_SUFFIX").unwrap_or(default.answer_key_suffix),
        }
    }

    /// 从环境变量读取配置，遇到无法解析的值直接报错
    pub fn try_from_env() -> Result<Self, ConfigError> {
        let default = Self::default();
        Ok(Self {
            answer_line_width: parse_env("ANSWER_LINE_WIDTH", "usize")?
                .unwrap_or(default.answer_line_width),
            max_nesting_depth: parse_env("MAX_NESTING_DEPTH", "usize")?
                .unwrap_or(default.max_nesting_depth),
            verbose_logging: parse_env("VERBOSE_LOGGING", "bool")?
                .unwrap_or(default.verbose_logging),
            ..Self::from_env()
        })
    }

    /// 覆盖试卷路径（命令行参数优先于环境变量）
    pub fn with_exam_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.exam_path = path.into();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }
}

fn env_or<T: FromStr>(var_name: &str, default: T) -> T {
    match std::env::var(var_name) {
        Ok(value) => value.parse().unwrap_or_else(|_| {
            warn!("环境变量 {} 的值 '{}' 无效，使用默认值", var_name, value);
            default
        }),
        Err(_) => default,
    }
}

fn parse_env<T: FromStr>(var_name: &str, expected_type: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var_name) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 环境变量是进程级共享状态，这里只用本测试独占的变量名
    #[test]
    fn test_parse_env_reports_invalid_value() {
        std::env::set_var("EXAM_EXPORT_TEST_WIDTH", "wide");
        let result: Result<Option<usize>, _> = parse_env("EXAM_EXPORT_TEST_WIDTH", "usize");
        std::env::remove_var("EXAM_EXPORT_TEST_WIDTH");

        assert_eq!(
            result,
            Err(ConfigError::EnvVarParseFailed {
                var_name: "EXAM_EXPORT_TEST_WIDTH".to_string(),
                value: "wide".to_string(),
                expected_type: "usize".to_string(),
            })
        );
    }

    #[test]
    fn test_env_or_falls_back_to_default() {
        std::env::set_var("EXAM_EXPORT_TEST_DEPTH", "-1");
        let depth: usize = env_or("EXAM_EXPORT_TEST_DEPTH", 3);
        std::env::remove_var("EXAM_EXPORT_TEST_DEPTH");
        assert_eq!(depth, 3);

        let missing: usize = env_or("EXAM_EXPORT_TEST_MISSING", 7);
        assert_eq!(missing, 7);
    }

    #[test]
    fn test_builder_overrides() {
        let config = Config::default()
            .with_exam_path("pruefung.toml")
            .with_output_dir("out");
        assert_eq!(config.exam_path, PathBuf::from("pruefung.toml"));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.answer_line_width, 80);
    }
}
