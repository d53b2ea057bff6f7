use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use cohortlab_engine::Participant;

/// Destination of a command's result: a file when `--output` is given, stdout otherwise.
pub struct Output {
    writer: Box<dyn Write>,
    label: String,
}

impl Output {
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize + ?Sized,
    {
        Output::from_output_path(output_path)?.write_json(value)
    }

    pub fn from_output_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        let Some(path) = output_path else {
            return Ok(Output {
                writer: Box::new(io::stdout().lock()),
                label: "stdout".to_owned(),
            });
        };
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output {
            writer: Box::new(BufWriter::new(file)),
            label: path.display().to_string(),
        })
    }

    pub fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize + ?Sized,
    {
        serde_json::to_writer_pretty(&mut self.writer, value)
            .with_context(|| format!("Failed to write JSON to {}", self.label))?;
        self.write_line("")
    }

    pub fn write_line(&mut self, line: &str) -> anyhow::Result<()> {
        writeln!(self.writer, "{line}")
            .and_then(|()| self.writer.flush())
            .with_context(|| format!("Failed to write to {}", self.label))
    }
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;
    serde_json::from_reader(io::BufReader::new(file))
        .with_context(|| format!("Failed to parse {} JSON file: {}", file_kind, path.display()))
}

/// Read and validate a cohort JSON file
///
/// The whole file is rejected if any participant is invalid.
pub fn read_cohort_file<P>(path: P) -> anyhow::Result<Vec<Participant>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read cohort file: {}", path.display()))?;
    cohortlab_engine::import_cohort_str(&json)
        .with_context(|| format!("Invalid cohort file: {}", path.display()))
}
