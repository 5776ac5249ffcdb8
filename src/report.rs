//! Final intelligence report.
//!
//! Built from a session that reached the report stage and rendered as plain
//! text, Markdown or JSON.

use std::fmt;

use serde::Serialize;

use crate::domain::{Classification, Recommendation, RiskLevel, Stage};
use crate::session::{SessionState, TransitionError};

/// Output format of a rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Markdown,
    Json,
}

/// Summary of a completed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub source: String,
    pub classification: Classification,
    pub risk_score: u8,
    pub risk_level: RiskLevel,
    pub summary: String,
    pub compliance_tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_hash: Option<String>,
    pub action_items: usize,
    pub action_plan: Vec<Recommendation>,
}

impl Report {
    /// Collect the report from a snapshot at the report stage.
    pub fn from_state(state: &SessionState) -> Result<Self, TransitionError> {
        if state.stage() != Stage::Report {
            return Err(TransitionError::WrongStage {
                action: "build report",
                expected: Stage::Report,
                actual: state.stage(),
            });
        }
        let analysis = state.analysis().ok_or(TransitionError::MissingAnalysis)?;
        let record = state.documentation();

        Ok(Self {
            source: state.retrieval().source.clone(),
            classification: state.retrieval().classification,
            risk_score: analysis.risk_score,
            risk_level: analysis.risk_level(),
            summary: analysis.summary.clone(),
            compliance_tags: analysis.compliance_tags.clone(),
            record_id: record.map(|r| r.id().to_string()),
            record_hash: record.map(|r| r.hash().to_string()),
            action_items: state.advice().len(),
            action_plan: state.advice().to_vec(),
        })
    }

    /// Render in the requested format.
    pub fn render(&self, format: ReportFormat) -> Result<String, serde_json::Error> {
        match format {
            ReportFormat::Text => Ok(self.render_text()),
            ReportFormat::Markdown => Ok(self.render_markdown()),
            ReportFormat::Json => self.render_json(),
        }
    }

    pub fn render_text(&self) -> String {
        self.to_string()
    }

    pub fn render_markdown(&self) -> String {
        Markdown(self).to_string()
    }

    pub fn render_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    fn risk_profile(&self) -> String {
        format!("{}/100 ({})", self.risk_score, self.risk_level)
    }

    fn tags(&self) -> String {
        if self.compliance_tags.is_empty() {
            "None".to_string()
        } else {
            self.compliance_tags.join(", ")
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "R.A.D.A.R. FINAL INTELLIGENCE REPORT")?;
        writeln!(f)?;
        writeln!(f, "Source:          {}", self.source)?;
        writeln!(f, "Classification:  {}", self.classification)?;
        writeln!(f, "Risk Profile:    {}", self.risk_profile())?;
        writeln!(f, "Compliance:      {}", self.tags())?;
        writeln!(f, "Action Items:    {}", self.action_items)?;
        if let Some(id) = &self.record_id {
            writeln!(f, "Record:          {id}")?;
        }
        writeln!(f)?;
        writeln!(f, "SUMMARY")?;
        writeln!(f, "{}", self.summary)?;
        writeln!(f)?;
        writeln!(f, "ACTION PLAN")?;

        if self.action_plan.is_empty() {
            writeln!(f, "No recommendations.")?;
        }
        for (i, rec) in self.action_plan.iter().enumerate() {
            writeln!(f, "{}. [{}] {}", i + 1, rec.priority, rec.title)?;
            writeln!(f, "   {}", rec.description)?;
            writeln!(f, "   Reference: {}", rec.reference_or_na())?;
        }
        Ok(())
    }
}

struct Markdown<'a>(&'a Report);

impl fmt::Display for Markdown<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;

        writeln!(f, "# R.A.D.A.R. Final Intelligence Report")?;
        writeln!(f)?;
        writeln!(f, "| Field | Value |")?;
        writeln!(f, "| --- | --- |")?;
        writeln!(f, "| Source | {} |", cell(&report.source))?;
        writeln!(f, "| Classification | {} |", report.classification)?;
        writeln!(f, "| Risk Profile | {} |", report.risk_profile())?;
        writeln!(f, "| Compliance | {} |", cell(&report.tags()))?;
        writeln!(f, "| Action Items | {} |", report.action_items)?;
        if let Some(id) = &report.record_id {
            writeln!(f, "| Record | `{id}` |")?;
        }
        writeln!(f)?;
        writeln!(f, "## Summary")?;
        writeln!(f)?;
        writeln!(f, "{}", report.summary)?;
        writeln!(f)?;
        writeln!(f, "## Action Plan")?;
        writeln!(f)?;

        if report.action_plan.is_empty() {
            return writeln!(f, "_No recommendations._");
        }
        writeln!(f, "| Priority | Action | Reference |")?;
        writeln!(f, "| --- | --- | --- |")?;
        for rec in &report.action_plan {
            writeln!(
                f,
                "| {} | {} | {} |",
                rec.priority,
                cell(&rec.title),
                cell(rec.reference_or_na())
            )?;
        }
        Ok(())
    }
}

/// Make text safe inside a Markdown table cell.
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
