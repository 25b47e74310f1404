//! CSV readers for the command line, turning exported crawl rows into records.

use super::domain::{CompanyRecord, JobRecord};
use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read crawl export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid crawl CSV data: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Deserialize)]
struct JobRow {
    #[serde(default, alias = "Title")]
    title: String,
    #[serde(default, alias = "Description")]
    description: String,
    #[serde(
        default,
        rename = "type",
        alias = "Type",
        alias = "raw_type",
        deserialize_with = "empty_string_as_none"
    )]
    raw_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompanyRow {
    #[serde(default, alias = "Name")]
    name: String,
    #[serde(default, alias = "Description")]
    description: String,
}

pub fn jobs_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<JobRecord>, ImportError> {
    let file = std::fs::File::open(path)?;
    jobs_from_reader(file)
}

pub fn jobs_from_reader<R: Read>(reader: R) -> Result<Vec<JobRecord>, ImportError> {
    let mut jobs = Vec::new();
    for row in csv_reader(reader).deserialize::<JobRow>() {
        let row = row?;
        jobs.push(JobRecord {
            title: row.title,
            description: row.description,
            raw_type: row.raw_type,
        });
    }
    Ok(jobs)
}

pub fn companies_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<CompanyRecord>, ImportError> {
    let file = std::fs::File::open(path)?;
    companies_from_reader(file)
}

pub fn companies_from_reader<R: Read>(reader: R) -> Result<Vec<CompanyRecord>, ImportError> {
    let mut companies = Vec::new();
    for row in csv_reader(reader).deserialize::<CompanyRow>() {
        let row = row?;
        companies.push(CompanyRecord::new(row.name, row.description));
    }
    Ok(companies)
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader)
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
