use crate::error::Error;
use crate::model::{ComparisonMode, GroupPairSimilarity, SelectedCluster};
use csv::{Writer, WriterBuilder};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

fn tab_writer<W: Write>(writer: W) -> Writer<W> {
    WriterBuilder::new().delimiter(b'\t').from_writer(writer)
}

// always keep the fractional part, so 95.0 stays "95.0"
fn format_float(value: f64) -> String {
    format!("{:?}", value)
}

fn join<T: ToString>(values: impl IntoIterator<Item = T>) -> String {
    values
        .into_iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

pub fn write_pair_report<W: Write>(writer: W, pairs: &[GroupPairSimilarity]) -> Result<(), Error> {
    let mut csv = tab_writer(writer);
    csv.write_record(["gid1", "gid2", "similarity", "filename"])?;
    for pair in pairs {
        csv.write_record([
            pair.group_id1.to_string(),
            pair.group_id2.to_string(),
            format_float(pair.similarity),
            pair.source_name.clone(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

/// Members are only listed for single submissions; in grouped mode they
/// repeat the groups column.
pub fn write_cluster_report<W: Write>(
    writer: W,
    clusters: &[SelectedCluster],
    mode: ComparisonMode,
) -> Result<(), Error> {
    let mut csv = tab_writer(writer);
    match mode {
        ComparisonMode::Submissions => {
            csv.write_record(["groups", "strength", "avg_similarity", "members"])?
        }
        ComparisonMode::Grouped => csv.write_record(["groups", "strength", "avg_similarity"])?,
    }

    for selected in clusters {
        let mut record = vec![
            join(&selected.groups),
            format_float(selected.cluster.strength),
            format_float(selected.cluster.avg_similarity),
        ];
        if mode == ComparisonMode::Submissions {
            record.push(join(&selected.cluster.members));
        }
        csv.write_record(&record)?;
    }
    csv.flush()?;
    Ok(())
}

pub fn write_pair_report_file(path: &Path, pairs: &[GroupPairSimilarity]) -> Result<(), Error> {
    write_pair_report(File::create(path)?, pairs)?;
    info!("Wrote {} group pairs to {}", pairs.len(), path.display());
    Ok(())
}

pub fn write_cluster_report_file(
    path: &Path,
    clusters: &[SelectedCluster],
    mode: ComparisonMode,
) -> Result<(), Error> {
    write_cluster_report(File::create(path)?, clusters, mode)?;
    info!("Wrote {} clusters to {}", clusters.len(), path.display());
    Ok(())
}
