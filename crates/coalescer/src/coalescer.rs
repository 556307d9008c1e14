//! 설정 기반 병합 파사드
//!
//! [`Coalescer`]는 `[coalescer]` 설정 섹션에서 형식별 크기 상한, 입력 확장자 필터,
//! 출력 이름 접두어를 읽어 디렉토리 간 병합을 수행합니다.
//!
//! ```text
//! input_dir --> DirSource --> merge(format, max_size) --> DirSink --> output_dir
//! ```

use std::path::Path;

use logcentral_core::config::CoalescerConfig;

use crate::error::CoalescerError;
use crate::format::Format;
use crate::merge::{MergeReport, OutputNamer, merge_with_namer};
use crate::storage::{BlobSink, BlobSource, DirSink, DirSource};

/// 설정 기반 병합기
#[derive(Debug, Clone)]
pub struct Coalescer {
    config: CoalescerConfig,
    namer: OutputNamer,
}

impl Coalescer {
    /// 설정으로 병합기를 생성합니다.
    pub fn new(config: CoalescerConfig) -> Self {
        let namer = OutputNamer::new(config.output_prefix.clone());
        Self { config, namer }
    }

    /// 현재 설정
    pub fn config(&self) -> &CoalescerConfig {
        &self.config
    }

    /// 형식별로 설정된 크기 상한
    pub fn max_size_for(&self, format: Format) -> u64 {
        match format {
            Format::Table => self.config.table_max_size,
            Format::Text => self.config.text_max_size,
            Format::Gzip => self.config.gzip_max_size,
        }
    }

    /// 임의의 소스/싱크 사이에서 병합합니다.
    ///
    /// `max_size`가 `None`이면 설정값을 사용합니다.
    pub fn merge(
        &self,
        source: &dyn BlobSource,
        sink: &dyn BlobSink,
        format: Format,
        max_size: Option<u64>,
    ) -> Result<MergeReport, CoalescerError> {
        let max_size = max_size.unwrap_or_else(|| self.max_size_for(format));
        merge_with_namer(source, sink, max_size, format, &self.namer)
    }

    /// 로컬 디렉토리 사이에서 병합합니다.
    ///
    /// 출력 디렉토리가 없으면 생성합니다. 입력 디렉토리는 수정하지 않습니다.
    pub fn merge_dirs(
        &self,
        input: &Path,
        output: &Path,
        format: Format,
        max_size: Option<u64>,
    ) -> Result<MergeReport, CoalescerError> {
        let source = DirSource::new(input).with_extension(&self.config.input_extension);
        let sink = DirSink::new(output)?;
        tracing::debug!(
            input = %input.display(),
            output = %output.display(),
            format = %format,
            "merging directories"
        );
        self.merge(&source, &sink, format, max_size)
    }
}

impl Default for Coalescer {
    fn default() -> Self {
        Self::new(CoalescerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logcentral_core::config::MIB;

    #[test]
    fn max_size_follows_config() {
        let config = CoalescerConfig {
            table_max_size: 10,
            text_max_size: 20,
            gzip_max_size: 30,
            ..CoalescerConfig::default()
        };
        let coalescer = Coalescer::new(config);
        assert_eq!(coalescer.max_size_for(Format::Table), 10);
        assert_eq!(coalescer.max_size_for(Format::Text), 20);
        assert_eq!(coalescer.max_size_for(Format::Gzip), 30);
    }

    #[test]
    fn defaults_match_format_defaults() {
        let coalescer = Coalescer::default();
        for format in Format::ALL {
            assert_eq!(coalescer.max_size_for(format), format.default_max_size());
        }
        assert_eq!(coalescer.max_size_for(Format::Table), MIB);
    }

    #[test]
    fn merge_dirs_applies_prefix_and_filter() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::write(input.path().join("a.log"), "a\n").unwrap();
        std::fs::write(input.path().join("b.log"), "b\n").unwrap();
        std::fs::write(input.path().join("skip.tmp"), "x\n").unwrap();

        let coalescer = Coalescer::new(CoalescerConfig {
            output_prefix: "merged".to_owned(),
            input_extension: "log".to_owned(),
            ..CoalescerConfig::default()
        });
        let report = coalescer
            .merge_dirs(input.path(), output.path(), Format::Text, None)
            .unwrap();

        assert_eq!(report.inputs, 2);
        assert_eq!(report.outputs.len(), 1);
        assert!(report.outputs[0].name.starts_with("merged-"));
        let merged = std::fs::read_to_string(output.path().join(&report.outputs[0].name)).unwrap();
        assert_eq!(merged, "a\nb\n");
    }

    #[test]
    fn explicit_zero_max_size_is_rejected() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let result = Coalescer::default().merge_dirs(input.path(), output.path(), Format::Text, Some(0));
        assert!(matches!(result, Err(CoalescerError::InvalidParameter { .. })));
    }
}
