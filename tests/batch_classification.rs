use posting_taxonomy::classification::import;
use posting_taxonomy::classification::{
    BatchConfig, ChunkFailurePolicy, Classifier, CompanyRecord, EmploymentCategory, JobRecord,
    RuleStore,
};
use std::path::PathBuf;
use std::sync::Arc;

fn classifier(workers: usize) -> Classifier {
    let config = BatchConfig {
        workers,
        ..BatchConfig::default()
    };
    Classifier::new(Arc::new(RuleStore::with_defaults()), config)
}

#[tokio::test]
async fn batch_results_follow_input_order() {
    let jobs = vec![
        JobRecord::new("Summer Intern", ""),
        JobRecord::new("Engineer", "requires 5 years of experience"),
        JobRecord::new("Barista", "part-time weekend shifts"),
    ];

    let output = classifier(2)
        .classify_batch(jobs.clone(), 2)
        .await
        .expect("batch runs");

    let titles: Vec<&str> = output.results.iter().map(|(job, _)| job.title.as_str()).collect();
    assert_eq!(titles, vec!["Summer Intern", "Engineer", "Barista"]);
    let categories: Vec<EmploymentCategory> =
        output.results.iter().map(|(_, category)| *category).collect();
    assert_eq!(
        categories,
        vec![
            EmploymentCategory::Intern,
            EmploymentCategory::FullTimeSocial,
            EmploymentCategory::PartTime,
        ]
    );
    assert_eq!(output.report.total, 3);
    assert_eq!(output.report.chunks, 2);
    assert_eq!(output.report.classified, 3);
}

#[tokio::test]
async fn batch_matches_single_record_classification() {
    let classifier = classifier(3);
    let jobs: Vec<JobRecord> = (0..57)
        .map(|n| match n % 4 {
            0 => JobRecord::new(format!("Intern #{n}"), ""),
            1 => JobRecord::new(format!("Analyst #{n}"), "1 year experience"),
            2 => JobRecord::new(format!("Cashier #{n}"), "兼职"),
            _ => JobRecord::new(format!("Director #{n}"), ""),
        })
        .collect();

    let output = classifier
        .classify_batch(jobs.clone(), 10)
        .await
        .expect("batch runs");

    assert_eq!(output.results.len(), jobs.len());
    assert_eq!(output.report.chunks, 6);
    for (job, (echoed, category)) in jobs.iter().zip(&output.results) {
        assert_eq!(job, echoed);
        assert_eq!(classifier.classify_job(job), *category);
    }
}

#[tokio::test]
async fn empty_batch_has_no_chunks() {
    let output = classifier(1)
        .classify_batch(Vec::new(), 500)
        .await
        .expect("empty batch runs");
    assert!(output.results.is_empty());
    assert_eq!(output.report.chunks, 0);
}

#[tokio::test]
async fn company_batch_from_csv_export() {
    let csv = "name,description\nAcme Software Ltd,\nGreen Valley Farms,organic produce\n,\n";
    let companies = import::companies_from_reader(csv.as_bytes()).expect("csv parses");
    assert_eq!(companies.len(), 3);

    let output = classifier(2)
        .classify_company_batch(companies, 1)
        .await
        .expect("batch runs");

    let names: Vec<&str> = output
        .results
        .iter()
        .map(|(company, _)| company.name.as_str())
        .collect();
    assert_eq!(names, vec!["Acme Software Ltd", "Green Valley Farms", ""]);
    assert_eq!(output.results[0].1.sector.as_deref(), Some("Technology"));
    assert!(output.results[2].1.is_unknown());
    assert_eq!(output.report.chunks, 3);
}

#[tokio::test]
async fn job_fixture_classifies_end_to_end() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/jobs.csv");
    let jobs = import::jobs_from_path(path).expect("fixture parses");
    assert_eq!(jobs.len(), 6);

    let output = classifier(2)
        .classify_batch(jobs, 4)
        .await
        .expect("batch runs");
    let categories: Vec<EmploymentCategory> =
        output.results.iter().map(|(_, category)| *category).collect();
    assert_eq!(
        categories,
        vec![
            EmploymentCategory::Intern,
            EmploymentCategory::FullTimeSocial,
            EmploymentCategory::FullTimeCampus,
            EmploymentCategory::Intern,
            EmploymentCategory::PartTime,
            EmploymentCategory::FullTimeSocial,
        ]
    );
}

#[test]
fn default_policy_substitutes_failed_chunks() {
    let config = BatchConfig::default();
    assert_eq!(config.failure_policy, ChunkFailurePolicy::Substitute);
    assert!(config.workers >= 1);
}

#[tokio::test]
async fn company_defaults_cover_unrelated_records() {
    let classifier = classifier(1);
    let result = classifier.classify_company(&CompanyRecord::new("", ""));
    assert!(result.is_unknown());
}
