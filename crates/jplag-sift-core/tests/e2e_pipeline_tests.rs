use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::tempdir;
use zip::write::FileOptions;
use zip::ZipWriter;

use jplag_sift_core::archive;
use jplag_sift_core::report::{write_cluster_report_file, write_pair_report_file};
use jplag_sift_core::{
    AppConfig, ComparisonMode, Error, ReportEngine, ReportOptions, SilentReporter, Threshold,
};

const LOG_PREFIX: &str = "2023-06-01 09:00:00,000 [main] [INFO] ClusteringFactory - ";

fn cluster_line(strength: f64, avg: f64, members: &[&str]) -> String {
    format!(
        "{LOG_PREFIX} cluster strength: {strength}, avg similarity: {avg}%, members: [{}]",
        members.join(", ")
    )
}

fn write_log(dir: &Path, lines: &[String]) -> PathBuf {
    let path = dir.join("jplag.log");
    let mut text = String::from("2023-06-01 08:59:59,000 [main] [INFO] JPlag - Starting\n");
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }
    fs::write(&path, text).unwrap();
    path
}

/// Write a results archive; each entry holds JPlag's comparison object.
fn write_archive(dir: &Path, entries: &[(&str, f64)]) -> PathBuf {
    let path = dir.join("results.zip");
    let mut zip = ZipWriter::new(File::create(&path).unwrap());
    zip.start_file("overview.json", FileOptions::default()).unwrap();
    zip.write_all(br#"{"submission_folder_path": ["subs"]}"#).unwrap();
    for (name, similarity) in entries {
        zip.start_file(*name, FileOptions::default()).unwrap();
        write!(zip, r#"{{"id1": "a", "id2": "b", "similarity": {similarity}}}"#).unwrap();
    }
    zip.finish().unwrap();
    path
}

fn submission_archive(dir: &Path) -> PathBuf {
    write_archive(
        dir,
        &[
            ("sub1_1_0_.cpp-sub1_2_0_.cpp.json", 0.99),
            ("sub1_1_0_.cpp-sub2_1_0_.cpp.json", 0.42),
            ("sub2_1_0_.cpp-sub1_2_0_.cpp.json", 0.81),
            ("sub3_1_0_.cpp-sub1_1_0_.cpp.json", 0.30),
            ("sub2_1_0_.cpp-sub3_1_0_.cpp.json", 0.10),
        ],
    )
}

#[test]
fn test_read_comparisons_skips_overview_and_same_group() {
    let tmp = tempdir().unwrap();
    let zip_path = submission_archive(tmp.path());

    let comparisons =
        archive::read_comparisons(&zip_path, ComparisonMode::Submissions, &SilentReporter)
            .unwrap();

    let names: Vec<&str> = comparisons.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "sub2_1_0_.cpp-sub1_2_0_.cpp.json",
            "sub1_1_0_.cpp-sub2_1_0_.cpp.json",
            "sub3_1_0_.cpp-sub1_1_0_.cpp.json",
            "sub2_1_0_.cpp-sub3_1_0_.cpp.json",
        ]
    );
    assert_eq!(comparisons[0].1, 0.81);
}

#[test]
fn test_read_comparisons_accepts_bare_numbers() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("grouped.zip");
    let mut zip = ZipWriter::new(File::create(&path).unwrap());
    zip.start_file("1-2.json", FileOptions::default()).unwrap();
    zip.write_all(b"80.0").unwrap();
    zip.start_file("2-1.json", FileOptions::default()).unwrap();
    zip.write_all(b"60.0").unwrap();
    zip.finish().unwrap();

    let comparisons =
        archive::read_comparisons(&path, ComparisonMode::Grouped, &SilentReporter).unwrap();
    assert_eq!(
        comparisons,
        vec![("1-2.json".to_string(), 80.0), ("2-1.json".to_string(), 60.0)]
    );
}

#[test]
fn test_read_comparisons_rejects_bad_entry_name() {
    let tmp = tempdir().unwrap();
    let zip_path = write_archive(tmp.path(), &[("not-a-comparison.json", 0.5)]);
    let result = archive::read_comparisons(&zip_path, ComparisonMode::Submissions, &SilentReporter);
    assert!(matches!(result, Err(Error::Grammar { .. })));
}

#[test]
fn test_full_report_pipeline_default_selection() {
    let tmp = tempdir().unwrap();
    let zip_path = submission_archive(tmp.path());
    let log_path = write_log(
        tmp.path(),
        &[
            format!("{LOG_PREFIX}3 clusters were found:"),
            cluster_line(0.4, 81.0, &["sub1_2_0_.cpp", "sub2_1_0_.cpp"]),
            cluster_line(0.9, 99.0, &["sub1_1_0_.cpp", "sub1_2_0_.cpp"]),
            cluster_line(0.1, 30.0, &["sub1_1_0_.cpp", "sub3_1_0_.cpp"]),
        ],
    );

    let engine = ReportEngine::new(AppConfig::default());
    let result = engine
        .run(&log_path, &zip_path, &ReportOptions::default(), &SilentReporter)
        .unwrap();

    assert_eq!(result.comparisons_read, 4);
    assert_eq!(result.group_pairs, 3);
    let keys: Vec<(u64, u64, f64)> = result
        .pairs
        .iter()
        .map(|p| (p.group_id1, p.group_id2, p.similarity))
        .collect();
    assert_eq!(keys, vec![(1, 2, 0.81), (1, 3, 0.30), (2, 3, 0.10)]);
    assert_eq!(result.pairs[0].source_name, "sub2_1_0_.cpp-sub1_2_0_.cpp.json");

    // the same-group cluster and the weak one are dropped at the 50% default
    assert_eq!(result.clusters_announced, Some(3));
    assert_eq!(result.clusters_parsed, 3);
    assert_eq!(result.clusters.len(), 1);
    assert_eq!(result.clusters[0].groups, vec![1, 2]);
}

#[test]
fn test_full_report_pipeline_with_threshold() {
    let tmp = tempdir().unwrap();
    let zip_path = submission_archive(tmp.path());
    let log_path = write_log(
        tmp.path(),
        &[
            cluster_line(0.4, 81.0, &["sub1_2_0_.cpp", "sub2_1_0_.cpp"]),
            cluster_line(0.3, 35.0, &["sub1_1_0_.cpp", "sub3_1_0_.cpp"]),
        ],
    );

    let engine = ReportEngine::new(AppConfig::default());
    let options = ReportOptions {
        mode: ComparisonMode::Submissions,
        similarity: Some(Threshold::new(0.3)),
    };
    let result = engine
        .run(&log_path, &zip_path, &options, &SilentReporter)
        .unwrap();

    // strictly greater than 0.3 for pairs
    assert_eq!(result.pairs.len(), 1);
    assert_eq!(result.pairs[0].similarity, 0.81);
    // at least 30% for clusters
    assert_eq!(result.clusters.len(), 2);
}

#[test]
fn test_report_files_are_written() {
    let tmp = tempdir().unwrap();
    let zip_path = submission_archive(tmp.path());
    let log_path = write_log(
        tmp.path(),
        &[cluster_line(0.4, 81.0, &["sub2_1_0_.cpp", "sub1_2_0_.cpp"])],
    );

    let engine = ReportEngine::new(AppConfig::default());
    let result = engine
        .run(&log_path, &zip_path, &ReportOptions::default(), &SilentReporter)
        .unwrap();

    let pairs_path = tmp.path().join("jplag_report.csv");
    let clusters_path = tmp.path().join("jplag_clusters_report.csv");
    write_pair_report_file(&pairs_path, &result.pairs).unwrap();
    write_cluster_report_file(&clusters_path, &result.clusters, ComparisonMode::Submissions)
        .unwrap();

    let pairs = fs::read_to_string(&pairs_path).unwrap();
    let mut lines = pairs.lines();
    assert_eq!(lines.next(), Some("gid1\tgid2\tsimilarity\tfilename"));
    assert_eq!(
        lines.next(),
        Some("1\t2\t0.81\tsub2_1_0_.cpp-sub1_2_0_.cpp.json")
    );
    assert_eq!(pairs.lines().count(), 4);

    let clusters = fs::read_to_string(&clusters_path).unwrap();
    assert_eq!(
        clusters,
        "groups\tstrength\tavg_similarity\tmembers\n1,2\t0.4\t81.0\tsub1_2_0_.cpp,sub2_1_0_.cpp\n"
    );
}

#[test]
fn test_grouped_report_pipeline() {
    let tmp = tempdir().unwrap();
    let zip_path = write_archive(
        tmp.path(),
        &[("1-2.json", 0.8), ("2-1.json", 0.6), ("3-1.json", 0.2)],
    );
    let log_path = write_log(tmp.path(), &[cluster_line(0.5, 75.0, &["2", "1"])]);

    let engine = ReportEngine::new(AppConfig::default());
    let options = ReportOptions {
        mode: ComparisonMode::Grouped,
        similarity: None,
    };
    let result = engine
        .run(&log_path, &zip_path, &options, &SilentReporter)
        .unwrap();

    assert_eq!(result.pairs.len(), 2);
    assert_eq!(result.pairs[0].source_name, "1-2.json");
    assert_eq!(result.pairs[0].similarity, 0.8);
    assert_eq!(result.clusters.len(), 1);
    assert_eq!(result.clusters[0].groups, vec![1, 2]);
}

#[test]
fn test_empty_inputs_yield_empty_results() {
    let tmp = tempdir().unwrap();
    let zip_path = write_archive(tmp.path(), &[]);
    let log_path = write_log(tmp.path(), &[]);

    let engine = ReportEngine::new(AppConfig::default());
    let result = engine
        .run(&log_path, &zip_path, &ReportOptions::default(), &SilentReporter)
        .unwrap();
    assert!(result.pairs.is_empty());
    assert!(result.clusters.is_empty());
    assert_eq!(result.clusters_announced, None);
}

#[test]
fn test_select_sources_from_directory() {
    let tmp = tempdir().unwrap();
    let sources = tmp.path().join("sources");
    fs::create_dir_all(&sources).unwrap();
    for name in [
        "sub1_1_0.0_.cpp",
        "sub2_4_0.0_.cpp",
        "sub3_2_50.0_.cpp",
        "sub4_1_0.0_.cpp",
        "sub5_1_0.0_.cpp",
    ] {
        fs::write(sources.join(name), "int main() {}").unwrap();
    }
    let log_path = write_log(
        tmp.path(),
        &[
            cluster_line(0.9, 95.0, &["sub1_1_0.0_.cpp", "sub2_4_0.0_.cpp"]),
            cluster_line(0.2, 60.0, &["sub3_2_50.0_.cpp", "sub4_1_0.0_.cpp"]),
        ],
    );

    let engine = ReportEngine::new(AppConfig::default());
    let selected = engine.select_sources(&log_path, &sources, None).unwrap();
    let names: Vec<String> = selected
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "sub1_1_0.0_.cpp",
            "sub3_2_50.0_.cpp",
            "sub4_1_0.0_.cpp",
            "sub5_1_0.0_.cpp",
        ]
    );

    // lowering the threshold to 50% deduplicates the second cluster too
    let selected = engine
        .select_sources(&log_path, &sources, Some(Threshold::new(0.5)))
        .unwrap();
    assert_eq!(selected.len(), 3);
    assert!(selected.iter().any(|p| p.ends_with("sub3_2_50.0_.cpp")));
    assert!(!selected.iter().any(|p| p.ends_with("sub4_1_0.0_.cpp")));
}

#[test]
fn test_missing_log_is_an_io_error() {
    let tmp = tempdir().unwrap();
    let zip_path = write_archive(tmp.path(), &[]);
    let engine = ReportEngine::new(AppConfig::default());
    let result = engine.run(
        &tmp.path().join("missing.log"),
        &zip_path,
        &ReportOptions::default(),
        &SilentReporter,
    );
    assert!(matches!(result, Err(Error::Io(_))));
}
