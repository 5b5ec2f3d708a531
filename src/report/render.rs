//! Plain-text rendering of the impact report.

use std::fmt::Write;

use super::ImpactReport;

/// Renders the report as sectioned plain text for terminal output.
#[must_use]
pub fn render_text(report: &ImpactReport) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = write_text(&mut out, report);
    out
}

fn write_text(out: &mut String, report: &ImpactReport) -> std::fmt::Result {
    writeln!(out, "{}", report.summary.title)?;
    writeln!(out, "{}", "=".repeat(report.summary.title.len()))?;
    writeln!(out)?;
    writeln!(out, "Scope:        {}", report.summary.scope)?;
    writeln!(out, "Duration:     {}", report.summary.duration)?;
    writeln!(out, "Overall risk: {}", report.overall_risk)?;
    writeln!(
        out,
        "Effort:       {} hours ({} working days, {})",
        report.effort.total_hours, report.effort.total_days, report.effort.team_size
    )?;
    writeln!(out)?;

    writeln!(out, "Changes")?;
    writeln!(out, "-------")?;
    writeln!(out, "Foreign keys:              {}", report.changes.fk_changes)?;
    writeln!(out, "Integrity fixes:           {}", report.changes.integrity_fixes)?;
    writeln!(
        out,
        "Performance optimizations: {}",
        report.changes.performance_optimizations
    )?;
    writeln!(out, "Total:                     {}", report.changes.total)?;
    writeln!(out)?;

    if !report.plans.is_empty() {
        writeln!(out, "Constraint plans (implementation order)")?;
        writeln!(out, "---------------------------------------")?;
        for plan in &report.plans {
            writeln!(
                out,
                "[{}] {} ({}, confidence {:.2}, risk {})",
                plan.priority,
                plan.name,
                plan.relationship.match_type,
                plan.relationship.confidence,
                plan.risk.level
            )?;
            writeln!(
                out,
                "    {} ON DELETE {} ON UPDATE {}",
                plan.relationship.label(),
                plan.cascade.on_delete,
                plan.cascade.on_update
            )?;
            writeln!(
                out,
                "    index {} (impact {}, ~{} rows)",
                plan.index_name, plan.index_impact, plan.estimated_rows
            )?;
        }
        writeln!(out)?;
    }

    let violations: Vec<_> = report.findings.iter().filter(|f| f.count > 0).collect();
    if !violations.is_empty() {
        writeln!(out, "Integrity findings")?;
        writeln!(out, "------------------")?;
        for finding in violations {
            writeln!(out, "[{}] {}: {}", finding.severity, finding.kind, finding.detail)?;
        }
        writeln!(out)?;
    }

    if !report.failures.is_empty() {
        writeln!(out, "Skipped subjects")?;
        writeln!(out, "----------------")?;
        for failure in &report.failures {
            writeln!(out, "{failure}")?;
        }
        writeln!(out)?;
    }

    writeln!(out, "Timeline: {}", report.timeline.total_duration)?;
    for phase in &report.timeline.phases {
        writeln!(
            out,
            "  Phase {}: {} ({}, risk {})",
            phase.phase, phase.name, phase.duration, phase.risk
        )?;
    }
    writeln!(out)?;

    writeln!(out, "Recommendation: {}", report.recommendation.decision)?;
    writeln!(out, "  Reasoning:   {}", report.recommendation.reasoning)?;
    writeln!(out, "  Alternative: {}", report.recommendation.alternative)?;
    Ok(())
}
