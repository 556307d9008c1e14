//! blob 저장소 추상화
//!
//! 병합기는 파일 시스템을 직접 다루지 않고 두 trait만 사용합니다.
//!
//! - [`BlobSource`]: 이름이 붙은 입력 blob을 지연 순회
//! - [`BlobSink`]: 출력 blob 생성. [`PendingBlob::commit`] 전까지는 보이지 않음
//!
//! 로컬 디렉토리 구현([`DirSource`], [`DirSink`])을 기본 제공하며,
//! 객체 스토리지 구현은 같은 trait을 구현하면 됩니다.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tempfile::NamedTempFile;

use crate::error::CoalescerError;

/// 입력 blob 하나
#[derive(Debug, Clone)]
pub struct Blob {
    /// blob 이름 (디렉토리 구현에서는 파일 이름)
    pub name: String,
    /// blob 원본 바이트
    pub data: Bytes,
}

impl Blob {
    /// 새 blob을 생성합니다.
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }
}

/// 입력 blob 이터레이터
pub type BlobIter<'a> = Box<dyn Iterator<Item = Result<Blob, CoalescerError>> + 'a>;

/// 입력 blob 소스
///
/// 모든 blob은 정확히 한 번 방문되어야 합니다. 순서 보장은 구현에 따릅니다.
pub trait BlobSource {
    /// blob 목록을 지연 순회하는 이터레이터를 반환합니다.
    fn blobs(&self) -> Result<BlobIter<'_>, CoalescerError>;
}

/// 커밋 대기 중인 출력 blob
///
/// 쓰기가 끝나면 [`commit`](PendingBlob::commit)으로 공개합니다.
/// 커밋하지 않고 drop하면 쓰던 내용은 폐기됩니다.
pub trait PendingBlob: Write + Send {
    /// 출력을 확정하고 공개된 위치를 반환합니다.
    fn commit(self: Box<Self>) -> Result<String, CoalescerError>;
}

/// 출력 blob 싱크
pub trait BlobSink {
    /// 주어진 이름으로 새 출력 blob을 엽니다.
    fn create(&self, name: &str) -> Result<Box<dyn PendingBlob>, CoalescerError>;
}

// --- 로컬 디렉토리 구현 ---

/// 로컬 디렉토리 입력 소스
///
/// 하위 디렉토리는 순회하지 않으며, 숨김 파일(`.`으로 시작)은 건너뜁니다.
/// 결정적인 출력을 위해 파일 이름 순으로 정렬하여 방문합니다.
/// 목록은 `blobs()` 호출 시점에 확정되고, 내용은 순회 시점에 하나씩 읽습니다.
#[derive(Debug, Clone)]
pub struct DirSource {
    dir: PathBuf,
    extension: Option<String>,
}

impl DirSource {
    /// 새 디렉토리 소스를 생성합니다.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            extension: None,
        }
    }

    /// 확장자 필터를 설정합니다 (`"gz"` 또는 `".gz"`). 빈 문자열이면 필터를 해제합니다.
    pub fn with_extension(mut self, extension: &str) -> Self {
        let ext = extension.trim_start_matches('.');
        self.extension = if ext.is_empty() {
            None
        } else {
            Some(ext.to_owned())
        };
        self
    }

    /// 소스 디렉토리 경로
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn accepts(&self, path: &Path) -> bool {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        if file_name.starts_with('.') {
            return false;
        }
        match &self.extension {
            Some(ext) => path.extension().and_then(|e| e.to_str()) == Some(ext.as_str()),
            None => true,
        }
    }
}

impl BlobSource for DirSource {
    fn blobs(&self) -> Result<BlobIter<'_>, CoalescerError> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            if self.accepts(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        tracing::debug!(
            dir = %self.dir.display(),
            count = paths.len(),
            "listed input blobs"
        );

        Ok(Box::new(paths.into_iter().map(|path| {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            let data = fs::read(&path).map_err(|e| {
                CoalescerError::decode(&name, "raw", format!("read failed: {e}"))
            })?;
            Ok(Blob::new(name, data))
        })))
    }
}

/// 로컬 디렉토리 출력 싱크
///
/// 대상 디렉토리 안의 숨김 임시 파일에 쓰고, 커밋 시 최종 이름으로 rename합니다.
/// 같은 이름의 파일이 이미 있으면 덮어쓰지 않고 실패합니다.
#[derive(Debug, Clone)]
pub struct DirSink {
    dir: PathBuf,
}

impl DirSink {
    /// 새 디렉토리 싱크를 생성합니다. 디렉토리가 없으면 만듭니다.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, CoalescerError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// 출력 디렉토리 경로
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl BlobSink for DirSink {
    fn create(&self, name: &str) -> Result<Box<dyn PendingBlob>, CoalescerError> {
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(CoalescerError::invalid(
                "name",
                format!("'{name}' is not a plain file name"),
            ));
        }
        let temp = tempfile::Builder::new()
            .prefix(".tmp-")
            .tempfile_in(&self.dir)
            .map_err(|e| CoalescerError::sink(name, e))?;
        Ok(Box::new(DirPendingBlob {
            name: name.to_owned(),
            target: self.dir.join(name),
            writer: BufWriter::new(temp),
        }))
    }
}

struct DirPendingBlob {
    name: String,
    target: PathBuf,
    writer: BufWriter<NamedTempFile>,
}

impl Write for DirPendingBlob {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl PendingBlob for DirPendingBlob {
    fn commit(self: Box<Self>) -> Result<String, CoalescerError> {
        let Self {
            name,
            target,
            writer,
        } = *self;
        let temp = writer
            .into_inner()
            .map_err(|e| CoalescerError::sink(&name, e.into_error()))?;
        temp.as_file()
            .sync_all()
            .map_err(|e| CoalescerError::sink(&name, e))?;
        temp.persist_noclobber(&target)
            .map_err(|e| CoalescerError::sink(&name, e.error))?;
        Ok(target.display().to_string())
    }
}
