use std::path::{Path, PathBuf};

use dtmfscan_decode::{Decoder, DigitSequence};
use rayon::prelude::*;

use crate::loader;

/// What happened to one input file.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    Decoded(DigitSequence),
    Missing,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: FileOutcome,
}

impl FileReport {
    /// One output line: `<path>: <digits>`.
    pub fn line(&self) -> String {
        match &self.outcome {
            FileOutcome::Decoded(digits) => format!("{}: {}", self.path.display(), digits),
            FileOutcome::Missing => format!("{}: (not found)", self.path.display()),
            FileOutcome::Failed(reason) => format!("{}: (failed: {})", self.path.display(), reason),
        }
    }
}

/// Load and decode a single file. Never panics on bad input; every problem
/// comes back as an outcome.
pub fn decode_file(decoder: &Decoder, path: &Path) -> FileOutcome {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "input file not found");
        return FileOutcome::Missing;
    }
    let waveform = match loader::load_waveform(path) {
        Ok(waveform) => waveform,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "failed to load");
            return FileOutcome::Failed(err.to_string());
        }
    };
    tracing::debug!(
        path = %path.display(),
        sample_rate_hz = waveform.sample_rate_hz,
        channels = waveform.channels,
        frames = waveform.frames(),
        "loaded"
    );
    match decoder.decode(&waveform.samples, waveform.channels, waveform.sample_rate_hz) {
        Ok(digits) => {
            tracing::info!(path = %path.display(), digits = %digits, "decoded");
            FileOutcome::Decoded(digits)
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "no digits decoded");
            FileOutcome::Failed(err.to_string())
        }
    }
}

/// Decode `paths` on a pool of `jobs` threads. Reports come back in input
/// order, and one bad file never stops the others.
pub fn decode_files(
    decoder: &Decoder,
    paths: &[PathBuf],
    jobs: usize,
) -> Result<Vec<FileReport>, rayon::ThreadPoolBuildError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.max(1))
        .build()?;
    Ok(pool.install(|| {
        paths
            .par_iter()
            .map(|path| FileReport {
                path: path.clone(),
                outcome: decode_file(decoder, path),
            })
            .collect()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtmfscan_synth::{synthesize, SynthConfig};

    fn write_dial(dir: &Path, name: &str, dial: &str) -> PathBuf {
        let path = dir.join(name);
        let samples = synthesize(dial, &SynthConfig::default()).expect("synth");
        loader::save_waveform(&path, 8000, &samples).expect("write");
        path
    }

    #[test]
    fn reports_keep_input_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let first = write_dial(dir.path(), "first.wav", "52");
        let missing = dir.path().join("missing.wav");
        let silent = dir.path().join("silent.wav");
        loader::save_waveform(&silent, 8000, &[0.0; 4000]).expect("write");
        let second = write_dial(dir.path(), "second.wav", "907");

        let paths = vec![first, missing, silent, second];
        let reports = decode_files(&Decoder::default(), &paths, 3).expect("pool");

        assert_eq!(reports.len(), 4);
        for (report, path) in reports.iter().zip(&paths) {
            assert_eq!(&report.path, path);
        }
        assert!(matches!(&reports[0].outcome, FileOutcome::Decoded(d) if d.to_string() == "52"));
        assert_eq!(reports[1].outcome, FileOutcome::Missing);
        assert!(matches!(reports[2].outcome, FileOutcome::Failed(_)));
        assert!(matches!(&reports[3].outcome, FileOutcome::Decoded(d) if d.to_string() == "907"));
    }

    #[test]
    fn single_job_matches_parallel() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths: Vec<_> = ["1", "23", "456"]
            .iter()
            .enumerate()
            .map(|(i, dial)| write_dial(dir.path(), &format!("{i}.wav"), dial))
            .collect();
        let decoder = Decoder::default();
        let serial = decode_files(&decoder, &paths, 1).expect("pool");
        let parallel = decode_files(&decoder, &paths, 8).expect("pool");
        assert_eq!(serial, parallel);
        let lines: Vec<String> = parallel.iter().map(FileReport::line).collect();
        assert_eq!(
            lines,
            paths
                .iter()
                .zip(["1", "23", "456"])
                .map(|(path, dial)| format!("{}: {}", path.display(), dial))
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn unreadable_file_fails_with_reason() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("garbage.wav");
        std::fs::write(&path, b"not a wav file").expect("write");
        match decode_file(&Decoder::default(), &path) {
            FileOutcome::Failed(reason) => assert!(reason.contains("WAV")),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn report_lines() {
        let report = FileReport {
            path: PathBuf::from("dialing1.wav"),
            outcome: FileOutcome::Missing,
        };
        assert_eq!(report.line(), "dialing1.wav: (not found)");
    }

    #[test]
    fn empty_list_yields_no_reports() {
        let reports = decode_files(&Decoder::default(), &[], 4).expect("pool");
        assert!(reports.is_empty());
    }
}
