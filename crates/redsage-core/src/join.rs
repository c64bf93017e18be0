//! Merging of streams before crunching.
//!
//! A payroll timesheet usually books all work onto one project, so every
//! stream not explicitly kept apart is summed into a single joined stream.

use crate::pipeline::PipelineData;
use crate::types::{StreamName, ValidationError};

/// Which streams keep their own identity when joining.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinConfig {
    /// Streams copied through unchanged.
    pub single_pipeline_names: Vec<String>,
}

impl JoinConfig {
    fn is_single(&self, name: &str) -> bool {
        self.single_pipeline_names.iter().any(|single| single == name)
    }
}

/// Merges all streams except the single ones into `"<first>-joined"`.
///
/// Hours are summed per date; zero-hour dates are kept. The joined stream is
/// named after the first merged stream in name order.
///
/// Fails with [`ValidationError::JoinedNameTaken`] if a single stream already
/// carries that name.
pub fn join_pipelines(
    data: &PipelineData,
    config: &JoinConfig,
) -> Result<PipelineData, ValidationError> {
    for name in &config.single_pipeline_names {
        if data.pipeline(name).is_none() {
            tracing::warn!(stream = %name, "single stream not found in input");
        }
    }

    let joined_name = data
        .iter()
        .map(|(name, _)| name)
        .find(|name| !config.is_single(name.as_str()))
        .map(StreamName::joined);
    if let Some(joined) = &joined_name {
        if config.is_single(joined.as_str()) && data.pipeline(joined.as_str()).is_some() {
            return Err(ValidationError::JoinedNameTaken {
                name: joined.to_string(),
            });
        }
    }

    let mut result = PipelineData::new();
    for (name, work) in data {
        let target = match &joined_name {
            Some(joined) if !config.is_single(name.as_str()) => {
                tracing::debug!(stream = %name, joined = %joined, "joining stream");
                joined.clone()
            }
            _ => name.clone(),
        };
        let entry = result.pipeline_mut(target);
        for (date, &hours) in work {
            entry.put_work_time(date.clone(), hours);
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::WorkPerDay;

    const PIPELINE_A: &str = "Pipeline A";
    const PIPELINE_B: &str = "Pipeline 2/B";

    fn input() -> PipelineData {
        let mut input = PipelineData::new();
        let a = input.add_pipeline(PIPELINE_A).unwrap();
        a.put_work_time("2021-05-03", 0.0);
        a.put_work_time("2021-05-04", 0.0);
        a.put_work_time("2021-05-05", 1.0);
        a.put_work_time("2021-05-06", 2.0);
        a.put_work_time("2021-05-07", 3.5);

        let b = input.add_pipeline(PIPELINE_B).unwrap();
        b.put_work_time("2021-05-03", 0.0);
        b.put_work_time("2021-05-04", 1.0);
        b.put_work_time("2021-05-05", 2.0);
        b.put_work_time("2021-05-06", 1.5);
        b.put_work_time("2021-05-07", 0.5);
        input
    }

    #[test]
    fn joins_all_streams_by_date() {
        let actual = join_pipelines(&input(), &JoinConfig::default()).unwrap();

        let mut expected = PipelineData::new();
        let joined = expected.add_pipeline("Pipeline 2/B-joined").unwrap();
        joined.put_work_time("2021-05-03", 0.0);
        joined.put_work_time("2021-05-04", 1.0);
        joined.put_work_time("2021-05-05", 3.0);
        joined.put_work_time("2021-05-06", 3.5);
        joined.put_work_time("2021-05-07", 4.0);
        assert_eq!(actual, expected);
    }

    #[test]
    fn single_streams_are_kept_apart() {
        let config = JoinConfig {
            single_pipeline_names: vec![PIPELINE_B.to_string()],
        };
        let actual = join_pipelines(&input(), &config).unwrap();

        assert_eq!(actual.entries(), 2);
        assert_eq!(
            actual.pipeline(PIPELINE_B),
            input().pipeline(PIPELINE_B)
        );
        assert_eq!(
            actual.pipeline("Pipeline A-joined"),
            input().pipeline(PIPELINE_A)
        );
    }

    #[test]
    fn only_single_streams_produce_no_joined_stream() {
        let config = JoinConfig {
            single_pipeline_names: vec![PIPELINE_A.to_string(), PIPELINE_B.to_string()],
        };
        assert_eq!(join_pipelines(&input(), &config).unwrap(), input());
    }

    #[test]
    fn unknown_single_stream_is_ignored() {
        let config = JoinConfig {
            single_pipeline_names: vec!["Pipeline C".to_string()],
        };
        let actual = join_pipelines(&input(), &config).unwrap();
        assert_eq!(actual.entries(), 1);
        assert!(actual.pipeline("Pipeline C").is_none());
    }

    #[test]
    fn empty_input_stays_empty() {
        assert!(
            join_pipelines(&PipelineData::new(), &JoinConfig::default())
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn single_stream_named_like_joined_stream_is_rejected() {
        let mut data = input();
        data.add_pipeline("Pipeline 2/B-joined")
            .unwrap()
            .put_work_time("2021-05-03", 8.0);
        let config = JoinConfig {
            single_pipeline_names: vec!["Pipeline 2/B-joined".to_string()],
        };

        assert_eq!(
            join_pipelines(&data, &config),
            Err(ValidationError::JoinedNameTaken {
                name: "Pipeline 2/B-joined".to_string()
            })
        );
    }

    #[test]
    fn unlisted_stream_named_like_joined_stream_is_merged() {
        let mut data = input();
        data.add_pipeline("Pipeline 2/B-joined")
            .unwrap()
            .put_work_time("2021-05-03", 8.0);

        let actual = join_pipelines(&data, &JoinConfig::default()).unwrap();
        assert_eq!(actual.entries(), 1);
        let mut expected = WorkPerDay::new();
        expected.put_work_time("2021-05-03", 8.0);
        expected.put_work_time("2021-05-04", 1.0);
        expected.put_work_time("2021-05-05", 3.0);
        expected.put_work_time("2021-05-06", 3.5);
        expected.put_work_time("2021-05-07", 4.0);
        assert_eq!(actual.pipeline("Pipeline 2/B-joined"), Some(&expected));
    }
}
