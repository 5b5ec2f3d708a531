#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use fkplan::audit::FindingKind;
    use fkplan::config::AnalyzerConfig;
    use fkplan::error::{MetadataError, MetadataResult, PipelineError};
    use fkplan::inference::MatchType;
    use fkplan::metadata::{
        orphan_key, ColumnRef, ExistingForeignKey, MetadataProvider, SnapshotData,
        SnapshotProvider, TableSchema,
    };
    use std::time::Duration;

    use fkplan::inference::InferenceEngine;
    use fkplan::planner::{CascadeAction, IndexImpact, RiskLevel};
    use fkplan::report::Decision;
    use fkplan::{run_pipeline, Pipeline};

    fn table(name: &str, columns: &[(&str, &str)]) -> TableSchema {
        TableSchema::new(
            name,
            columns
                .iter()
                .map(|(col, ty)| ColumnRef::new(name, *col, *ty))
                .collect(),
        )
    }

    fn northwind() -> SnapshotData {
        let mut data = SnapshotData {
            tables: vec![
                table("Orders", &[("OrderID", "int"), ("CustomerID", "int")]),
                table("Customers", &[("CustomerID", "int"), ("CompanyName", "varchar")]),
                table("OrderDetails", &[("OrderID", "int"), ("ProductID", "int")]),
                table("Products", &[("ProductID", "int"), ("ProductName", "varchar")]),
            ],
            ..Default::default()
        };
        data.row_counts.insert("orders".to_string(), 500);
        data.row_counts.insert("orderdetails".to_string(), 2000);
        data
    }

    #[tokio::test]
    async fn test_clean_schema_produces_go_report() {
        let provider = SnapshotProvider::new(northwind());
        let outcome = Pipeline::new(&provider, AnalyzerConfig::default())
            .run()
            .await
            .expect("pipeline runs");

        assert!(!outcome.candidates.is_empty());
        assert_eq!(outcome.plans.len(), outcome.candidates.len());
        assert!(outcome.audit.skipped.is_empty());

        let report = &outcome.report;
        assert_eq!(report.changes.fk_changes, outcome.plans.len());
        assert_eq!(report.recommendation.decision, Decision::Go);
    }

    #[tokio::test]
    async fn test_orphaned_rows_flow_through_to_high_risk_plan() {
        let mut data = northwind();
        data.orphan_counts.insert(
            orphan_key("OrderDetails", "OrderID", "Orders", "OrderID"),
            15,
        );
        let provider = SnapshotProvider::new(data);

        let outcome = Pipeline::new(&provider, AnalyzerConfig::default())
            .run()
            .await
            .expect("pipeline runs");

        let plan = outcome
            .plans
            .iter()
            .find(|p| {
                p.relationship.source.table == "OrderDetails"
                    && p.relationship.source.column == "OrderID"
                    && p.relationship.target.table == "Orders"
                    && p.relationship.target.column == "OrderID"
            })
            .expect("plan for OrderDetails.OrderID -> Orders.OrderID");

        assert_eq!(plan.relationship.match_type, MatchType::ExactMatch);
        assert_eq!(plan.risk.level, RiskLevel::High);
        assert_eq!(plan.cascade.on_delete, CascadeAction::Cascade);
        assert!(outcome
            .audit
            .findings
            .iter()
            .any(|f| f.kind == FindingKind::OrphanedRecords && f.count == 15));
        assert_eq!(outcome.report.overall_risk, fkplan::report::OverallRisk::High);
    }

    #[tokio::test]
    async fn test_declared_constraints_are_not_replanned() {
        let mut data = northwind();
        data.foreign_keys.push(ExistingForeignKey {
            constraint_name: "FK_Orders_Customers".to_string(),
            source: ColumnRef::new("Orders", "CustomerID", "int"),
            target: ColumnRef::new("Customers", "CustomerID", "int"),
        });
        let provider = SnapshotProvider::new(data);

        let outcome = Pipeline::new(&provider, AnalyzerConfig::default())
            .run()
            .await
            .expect("pipeline runs");

        assert!(!outcome.candidates.iter().any(|c| {
            c.source.table == "Orders" && c.target.table == "Customers"
        }));
        // The declared constraint still gets an integrity verdict.
        assert!(outcome
            .audit
            .findings
            .iter()
            .any(|f| f.kind == FindingKind::FkViolation));
    }

    #[tokio::test]
    async fn test_row_counts_flow_into_index_impact() {
        let provider = SnapshotProvider::new(northwind());
        let outcome = Pipeline::new(&provider, AnalyzerConfig::default())
            .run()
            .await
            .expect("pipeline runs");

        // OrderDetails has 2000 rows in the snapshot, Orders 500.
        let detail_plan = outcome
            .plans
            .iter()
            .find(|p| p.relationship.source.table == "OrderDetails")
            .expect("plan sourced from OrderDetails");
        assert_eq!(detail_plan.estimated_rows, 2000);
        assert_eq!(detail_plan.index_impact, IndexImpact::Low);

        let orders_plan = outcome
            .plans
            .iter()
            .find(|p| p.relationship.source.table == "Orders")
            .expect("plan sourced from Orders");
        assert_eq!(orders_plan.estimated_rows, 500);
        assert_eq!(orders_plan.index_impact, IndexImpact::Minimal);
    }

    #[tokio::test]
    async fn test_infer_from_provider_matches_pure_inference() {
        let provider = SnapshotProvider::new(northwind());
        let timeout = AnalyzerConfig::default().queries.timeout();

        let engine = InferenceEngine::new();
        let fetched = engine
            .infer_from_provider(&provider, timeout)
            .await
            .expect("inference runs");

        let schema = provider.schema_snapshot().await.unwrap();
        let existing = provider.existing_foreign_keys().await.unwrap();
        assert_eq!(fetched, engine.infer(&schema, &existing));
    }

    #[tokio::test]
    async fn test_infer_from_provider_propagates_metadata_errors() {
        let result = InferenceEngine::new()
            .infer_from_provider(&DownProvider, Duration::from_secs(1))
            .await;
        assert!(matches!(
            result,
            Err(PipelineError::MetadataUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_run_pipeline_returns_report_directly() {
        let provider = SnapshotProvider::new(northwind());
        let report = run_pipeline(&provider, AnalyzerConfig::default())
            .await
            .expect("pipeline runs");
        assert!(report.changes.total > 0);
        assert_eq!(report.timeline.phases.len(), 5);
    }

    struct DownProvider;

    #[async_trait]
    impl MetadataProvider for DownProvider {
        async fn list_tables(&self) -> MetadataResult<Vec<String>> {
            Err(MetadataError::Unavailable("connection refused".to_string()))
        }

        async fn table_schema(&self, table: &str) -> MetadataResult<TableSchema> {
            Err(MetadataError::UnknownTable(table.to_string()))
        }

        async fn existing_foreign_keys(&self) -> MetadataResult<Vec<ExistingForeignKey>> {
            Err(MetadataError::Unavailable("connection refused".to_string()))
        }

        async fn count_orphans(
            &self,
            _parent_table: &str,
            _parent_column: &str,
            _child_table: &str,
            _child_column: &str,
        ) -> MetadataResult<u64> {
            Err(MetadataError::Query("connection refused".to_string()))
        }

        async fn count_duplicates(&self, _table: &str, _column: &str) -> MetadataResult<(u64, u64)> {
            Err(MetadataError::Query("connection refused".to_string()))
        }

        async fn count_nulls(&self, _table: &str, _column: &str) -> MetadataResult<(u64, u64)> {
            Err(MetadataError::Query("connection refused".to_string()))
        }

        async fn row_count(&self, _table: &str) -> MetadataResult<u64> {
            Err(MetadataError::Query("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_unreachable_provider_fails_the_run() {
        let result = run_pipeline(&DownProvider, AnalyzerConfig::default()).await;
        assert!(matches!(
            result,
            Err(PipelineError::MetadataUnavailable(_))
        ));
    }

    /// Delegates to a snapshot but fails every counting query against one
    /// child table.
    struct FlakyProvider {
        inner: SnapshotProvider,
        broken_table: String,
    }

    #[async_trait]
    impl MetadataProvider for FlakyProvider {
        async fn list_tables(&self) -> MetadataResult<Vec<String>> {
            self.inner.list_tables().await
        }

        async fn table_schema(&self, table: &str) -> MetadataResult<TableSchema> {
            self.inner.table_schema(table).await
        }

        async fn existing_foreign_keys(&self) -> MetadataResult<Vec<ExistingForeignKey>> {
            self.inner.existing_foreign_keys().await
        }

        async fn count_orphans(
            &self,
            parent_table: &str,
            parent_column: &str,
            child_table: &str,
            child_column: &str,
        ) -> MetadataResult<u64> {
            if child_table.eq_ignore_ascii_case(&self.broken_table) {
                return Err(MetadataError::Query("lock timeout".to_string()));
            }
            self.inner
                .count_orphans(parent_table, parent_column, child_table, child_column)
                .await
        }

        async fn count_duplicates(&self, table: &str, column: &str) -> MetadataResult<(u64, u64)> {
            self.inner.count_duplicates(table, column).await
        }

        async fn count_nulls(&self, table: &str, column: &str) -> MetadataResult<(u64, u64)> {
            self.inner.count_nulls(table, column).await
        }

        async fn row_count(&self, table: &str) -> MetadataResult<u64> {
            self.inner.row_count(table).await
        }
    }

    #[tokio::test]
    async fn test_per_subject_failures_do_not_abort_the_run() {
        let provider = FlakyProvider {
            inner: SnapshotProvider::new(northwind()),
            broken_table: "OrderDetails".to_string(),
        };

        let outcome = Pipeline::new(&provider, AnalyzerConfig::default())
            .run()
            .await
            .expect("pipeline still runs");

        // OrderDetails candidates were skipped, not fatal.
        assert!(!outcome.audit.skipped.is_empty());
        assert!(outcome
            .audit
            .skipped
            .iter()
            .all(|f| f.subject.contains("OrderDetails")));
        // The rest of the schema was still planned and reported.
        assert!(outcome
            .plans
            .iter()
            .any(|p| p.relationship.source.table == "Orders"));
        assert!(outcome.report.changes.total > 0);
        assert!(!outcome.report.failures.is_empty());
    }
}
