//! Run summary rendering

use crate::pipeline::{ConsumerReport, PipelineReport, ProducerOutcome, ProducerReport};
use colored::Colorize;
use std::fmt::Write;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for SummaryFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(SummaryFormat::Text),
            "json" => Ok(SummaryFormat::Json),
            other => Err(format!(
                "Unknown summary format '{}' (expected 'text' or 'json')",
                other
            )),
        }
    }
}

/// Render the report in the requested format
pub fn render_summary(
    report: &PipelineReport,
    format: SummaryFormat,
) -> Result<String, serde_json::Error> {
    match format {
        SummaryFormat::Json => serde_json::to_string_pretty(report),
        SummaryFormat::Text => Ok(render_text(report)),
    }
}

fn render_text(report: &PipelineReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", "Pipeline summary".bold());
    let _ = writeln!(
        out,
        "  elapsed: {}ms, queue capacity {}, high watermark {}",
        report.elapsed_ms, report.queue.capacity, report.queue.high_watermark
    );

    for producer in &report.producers {
        let _ = writeln!(out, "  {}", producer_line(producer));
    }
    for consumer in &report.consumers {
        let _ = writeln!(out, "  {}", consumer_line(consumer));
    }
    for failure in &report.failures {
        let _ = writeln!(out, "  {}", failure.to_string().red());
    }

    let totals = format!(
        "total: {} delivered, {} processed",
        report.total_delivered(),
        report.total_processed()
    );
    let totals = if report.is_clean() {
        totals.green()
    } else {
        totals.yellow()
    };
    let _ = write!(out, "  {}", totals);
    out
}

fn producer_line(producer: &ProducerReport) -> String {
    let outcome = match producer.outcome {
        ProducerOutcome::Completed => "completed".normal(),
        ProducerOutcome::Preempted => "preempted".yellow(),
    };
    format!(
        "producer {}: {}/{} delivered ({})",
        producer.producer_id, producer.delivered, producer.requested, outcome
    )
}

fn consumer_line(consumer: &ConsumerReport) -> String {
    format!(
        "consumer {}: {} processed ({} after close)",
        consumer.consumer_id, consumer.processed, consumer.drained_after_close
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::QueueStats;
    use serial_test::serial;

    fn report() -> PipelineReport {
        PipelineReport {
            producers: vec![ProducerReport {
                producer_id: 0,
                requested: 2,
                delivered: 2,
                outcome: ProducerOutcome::Completed,
            }],
            consumers: vec![ConsumerReport {
                consumer_id: 0,
                processed: 2,
                drained_after_close: 0,
                records: Vec::new(),
            }],
            queue: QueueStats {
                capacity: 5,
                buffered: 0,
                enqueued_total: 2,
                dequeued_total: 2,
                rejected_total: 0,
                high_watermark: 1,
                closed: true,
            },
            failures: Vec::new(),
            elapsed_ms: 42,
        }
    }

    #[test]
    fn test_summary_format_from_str() {
        assert_eq!("json".parse::<SummaryFormat>(), Ok(SummaryFormat::Json));
        assert_eq!(" Text ".parse::<SummaryFormat>(), Ok(SummaryFormat::Text));
        assert!("xml".parse::<SummaryFormat>().is_err());
    }

    #[test]
    #[serial]
    fn test_text_summary() {
        colored::control::set_override(false);
        let text = render_summary(&report(), SummaryFormat::Text).unwrap();
        colored::control::unset_override();

        assert!(text.contains("producer 0: 2/2 delivered (completed)"));
        assert!(text.contains("consumer 0: 2 processed (0 after close)"));
        assert!(text.contains("total: 2 delivered, 2 processed"));
    }

    #[test]
    fn test_json_summary() {
        let json = render_summary(&report(), SummaryFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["elapsed_ms"], 42);
        assert_eq!(value["consumers"][0]["processed"], 2);
    }
}
