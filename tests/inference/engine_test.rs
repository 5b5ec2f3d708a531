#[cfg(test)]
mod tests {
    use fkplan::inference::{InferenceEngine, MatchType};
    use fkplan::metadata::{ColumnRef, ExistingForeignKey, SchemaSnapshot, TableSchema};

    fn table(name: &str, columns: &[(&str, &str)]) -> TableSchema {
        TableSchema::new(
            name,
            columns
                .iter()
                .map(|(col, ty)| ColumnRef::new(name, *col, *ty))
                .collect(),
        )
    }

    fn northwind_fragment() -> SchemaSnapshot {
        SchemaSnapshot::new(vec![
            table("Orders", &[("OrderID", "int"), ("CustomerID", "int"), ("Freight", "decimal")]),
            table("Customers", &[("CustomerID", "int"), ("CompanyName", "varchar")]),
        ])
    }

    #[test]
    fn test_exact_match_yields_single_directed_candidate() {
        let snapshot = northwind_fragment();
        let candidates = InferenceEngine::new().infer(&snapshot, &[]);

        assert_eq!(candidates.len(), 1);
        let candidate = &candidates[0];
        assert_eq!(candidate.source.table, "Orders");
        assert_eq!(candidate.source.column, "CustomerID");
        assert_eq!(candidate.target.table, "Customers");
        assert_eq!(candidate.target.column, "CustomerID");
        assert_eq!(candidate.match_type, MatchType::ExactMatch);
        assert_eq!(candidate.confidence, 1.0);
    }

    #[test]
    fn test_declared_constraint_excludes_candidate() {
        let snapshot = northwind_fragment();
        let existing = vec![ExistingForeignKey {
            constraint_name: "FK_Orders_Customers".to_string(),
            source: ColumnRef::new("Orders", "CustomerID", "int"),
            target: ColumnRef::new("Customers", "CustomerID", "int"),
        }];

        let candidates = InferenceEngine::new().infer(&snapshot, &existing);
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_incompatible_types_are_not_candidates() {
        let snapshot = SchemaSnapshot::new(vec![
            table("Orders", &[("CustomerID", "varchar")]),
            table("Customers", &[("CustomerID", "int")]),
        ]);
        let candidates = InferenceEngine::new().infer(&snapshot, &[]);
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_table_name_pattern_candidate() {
        let snapshot = SchemaSnapshot::new(vec![
            table("Orders", &[("CustomerRef", "int")]),
            table("Customers", &[("ID", "int")]),
        ]);
        let candidates = InferenceEngine::new().infer(&snapshot, &[]);

        assert_eq!(candidates.len(), 1);
        let candidate = &candidates[0];
        assert_eq!(candidate.match_type, MatchType::TableNamePattern);
        assert_eq!(candidate.source.column, "CustomerRef");
        assert_eq!(candidate.target.table, "Customers");
        // 0.5 base + 0.3 pattern, no identifier bonuses.
        assert!((candidate.confidence - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_bare_id_pattern_is_discarded() {
        let snapshot = SchemaSnapshot::new(vec![
            table("Shipments", &[("VendorID", "int")]),
            table("Regions", &[("ZoneID", "int")]),
        ]);
        let candidates = InferenceEngine::new().infer(&snapshot, &[]);
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_inference_is_idempotent_and_ordered() {
        let snapshot = SchemaSnapshot::new(vec![
            table("Orders", &[("OrderID", "int"), ("CustomerID", "int"), ("EmployeeID", "int")]),
            table("Customers", &[("CustomerID", "int")]),
            table("Employees", &[("EmployeeID", "int")]),
            table("OrderDetails", &[("OrderID", "int"), ("ProductRef", "int")]),
            table("Products", &[("ProductID", "int"), ("ProductRef", "int")]),
        ]);

        let first = InferenceEngine::new().infer(&snapshot, &[]);
        let second = InferenceEngine::new().infer(&snapshot, &[]);

        assert_eq!(first, second);
        assert!(!first.is_empty());
        for pair in first.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
        }
    }

    #[test]
    fn test_exclusion_is_case_insensitive() {
        let snapshot = northwind_fragment();
        let existing = vec![ExistingForeignKey {
            constraint_name: "fk_orders_customers".to_string(),
            source: ColumnRef::new("ORDERS", "customerid", "int"),
            target: ColumnRef::new("customers", "CUSTOMERID", "int"),
        }];

        let candidates = InferenceEngine::new().infer(&snapshot, &existing);
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_all_confidences_within_unit_interval() {
        let snapshot = SchemaSnapshot::new(vec![
            table("OrderDetails", &[("OrderID", "int"), ("ProductID", "int")]),
            table("Orders", &[("OrderID", "int")]),
            table("Products", &[("ProductID", "int")]),
        ]);
        let candidates = InferenceEngine::new().infer(&snapshot, &[]);
        assert!(!candidates.is_empty());
        for candidate in &candidates {
            assert!(candidate.confidence >= 0.0 && candidate.confidence <= 1.0);
        }
    }
}
