#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use fkplan::audit::{FindingKind, IntegrityFinding, Severity};
    use fkplan::inference::{confidence, CandidateRelationship, MatchType};
    use fkplan::metadata::ColumnRef;
    use fkplan::planner::{CascadeAction, ConstraintPlanner, IndexImpact, RiskLevel};

    fn exact(
        source_table: &str,
        source_column: &str,
        target_table: &str,
        target_column: &str,
    ) -> CandidateRelationship {
        CandidateRelationship {
            source: ColumnRef::new(source_table, source_column, "int"),
            target: ColumnRef::new(target_table, target_column, "int"),
            match_type: MatchType::ExactMatch,
            confidence: confidence(MatchType::ExactMatch, source_column, target_column),
        }
    }

    fn orphan_finding(candidate: &CandidateRelationship, count: u64) -> IntegrityFinding {
        IntegrityFinding {
            source: candidate.source.clone(),
            target: Some(candidate.target.clone()),
            kind: FindingKind::OrphanedRecords,
            count,
            severity: Severity::from_count(count),
            detail: String::new(),
        }
    }

    #[test]
    fn test_clean_orders_customers_plan() {
        let candidate = exact("Orders", "CustomerID", "Customers", "CustomerID");
        let outcome = ConstraintPlanner::new().plan(
            std::slice::from_ref(&candidate),
            &[orphan_finding(&candidate, 0)],
            &HashMap::new(),
        );

        assert_eq!(outcome.plans.len(), 1);
        assert!(outcome.rejected.is_empty());
        let plan = &outcome.plans[0];

        assert_eq!(plan.name, "FK_Orders_CustomerID_Customers");
        assert_eq!(plan.risk.level, RiskLevel::Low);
        assert_eq!(plan.priority, 8);
        assert_eq!(plan.cascade.on_delete, CascadeAction::Restrict);
        assert_eq!(plan.cascade.on_update, CascadeAction::Cascade);
        assert!(plan.requires_index);
        assert_eq!(plan.index_name, "IX_Orders_CustomerID");
    }

    #[test]
    fn test_orphaned_detail_table_plan_is_high_risk_with_cascade() {
        let candidate = exact("OrderDetails", "OrderID", "Orders", "OrderID");
        let finding = orphan_finding(&candidate, 15);
        assert_eq!(finding.severity, Severity::Medium);

        let outcome = ConstraintPlanner::new().plan(
            std::slice::from_ref(&candidate),
            &[finding],
            &HashMap::new(),
        );
        let plan = &outcome.plans[0];

        assert_eq!(plan.risk.level, RiskLevel::High);
        assert_eq!(plan.cascade.on_delete, CascadeAction::Cascade);
        assert_eq!(plan.violation_count, 15);
        assert!(plan
            .risk
            .factors
            .iter()
            .any(|f| f.contains("orphaned records require cleanup")));
    }

    #[test]
    fn test_ddl_and_rollback_share_constraint_name() {
        let candidate = exact("Orders", "CustomerID", "Customers", "CustomerID");
        let outcome =
            ConstraintPlanner::new().plan(std::slice::from_ref(&candidate), &[], &HashMap::new());
        let plan = &outcome.plans[0];

        assert!(plan.ddl.contains(&format!("ADD CONSTRAINT [{}]", plan.name)));
        assert!(plan.rollback.contains(&format!("DROP CONSTRAINT [{}];", plan.name)));
        assert!(plan
            .rollback
            .contains(&format!("WHERE CONSTRAINT_NAME = '{}';", plan.name)));
    }

    #[test]
    fn test_ddl_sections_are_marked_with_comment_lines() {
        let candidate = exact("Orders", "CustomerID", "Customers", "CustomerID");
        let outcome =
            ConstraintPlanner::new().plan(std::slice::from_ref(&candidate), &[], &HashMap::new());
        let plan = &outcome.plans[0];

        for marker in [
            "-- Create Foreign Key Constraint:",
            "-- Step 1: Create supporting index if needed",
            "-- Step 2: Create the foreign key constraint",
            "-- Step 3: Verify constraint creation",
            "-- Cascade Options:",
        ] {
            assert!(plan.ddl.contains(marker), "missing marker {marker:?}");
        }
        assert!(plan.ddl.contains("ON DELETE RESTRICT"));
        assert!(plan.ddl.contains("ON UPDATE CASCADE;"));
    }

    #[test]
    fn test_priority_bounds_hold_for_all_plans() {
        let candidates = vec![
            exact("OrderDetails", "OrderID", "Orders", "OrderID"),
            exact("TransactionLog", "AccountID", "Accounts", "AccountID"),
            exact("Products", "SupplierID", "Suppliers", "SupplierID"),
        ];
        let findings: Vec<_> = candidates
            .iter()
            .map(|c| orphan_finding(c, 5000))
            .collect();

        let outcome = ConstraintPlanner::new().plan(&candidates, &findings, &HashMap::new());
        for plan in &outcome.plans {
            assert!((1..=10).contains(&plan.priority));
            assert_eq!(plan.risk.level, RiskLevel::High);
        }
    }

    #[test]
    fn test_ordering_puts_safer_work_first() {
        let risky = exact("OrderDetails", "ProductID", "Products", "ProductID");
        let clean = exact("Employees", "RegionID", "Regions", "RegionID");
        let outcome = ConstraintPlanner::new().plan(
            &[risky.clone(), clean.clone()],
            &[orphan_finding(&risky, 200)],
            &HashMap::new(),
        );

        assert_eq!(outcome.plans[0].relationship, clean);
        assert_eq!(outcome.plans[0].risk.level, RiskLevel::Low);
        assert_eq!(outcome.plans[1].risk.level, RiskLevel::High);
    }

    #[test]
    fn test_malformed_candidate_rejected_at_planner_boundary() {
        let mut broken = exact("Orders", "CustomerID", "Customers", "CustomerID");
        broken.source.column = String::new();

        let outcome = ConstraintPlanner::new().plan(&[broken], &[], &HashMap::new());
        assert!(outcome.plans.is_empty());
        assert_eq!(outcome.rejected.len(), 1);
        assert!(outcome.rejected[0].reason.contains("missing"));
    }

    #[test]
    fn test_index_impact_reflects_source_table_size() {
        let large = exact("Shipments", "CarrierID", "Carriers", "CarrierID");
        let small = exact("Regions", "TerritoryID", "Territories", "TerritoryID");

        let mut row_counts = HashMap::new();
        row_counts.insert("shipments".to_string(), 500_000_u64);
        row_counts.insert("regions".to_string(), 120_u64);

        let outcome =
            ConstraintPlanner::new().plan(&[large.clone(), small.clone()], &[], &row_counts);

        let shipments = outcome
            .plans
            .iter()
            .find(|p| p.relationship.source.table == "Shipments")
            .expect("plan for Shipments");
        assert_eq!(shipments.estimated_rows, 500_000);
        assert_eq!(shipments.index_impact, IndexImpact::High);

        let regions = outcome
            .plans
            .iter()
            .find(|p| p.relationship.source.table == "Regions")
            .expect("plan for Regions");
        assert_eq!(regions.estimated_rows, 120);
        assert_eq!(regions.index_impact, IndexImpact::Minimal);
    }

    #[test]
    fn test_column_scoped_finding_matches_either_endpoint() {
        let candidate = exact("Orders", "CustomerID", "Customers", "CustomerID");
        // A null finding on the source column, with no target.
        let finding = IntegrityFinding {
            source: ColumnRef::new("Orders", "CustomerID", "int"),
            target: None,
            kind: FindingKind::ExcessiveNulls,
            count: 12,
            severity: Severity::Medium,
            detail: String::new(),
        };

        let outcome = ConstraintPlanner::new().plan(
            std::slice::from_ref(&candidate),
            &[finding],
            &HashMap::new(),
        );
        assert_eq!(outcome.plans[0].risk.level, RiskLevel::High);
        assert_eq!(outcome.plans[0].violation_count, 12);
    }
}
