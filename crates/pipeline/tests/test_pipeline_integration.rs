//! End-to-end tests that drive the pipeline from CSV files on disk.

#[cfg(test)]
mod pipeline_integration_tests {
    use core_types::Action;
    use pipeline::{process_transactions, Pipeline, PipelineError, PipelinePhase};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const EPSILON: f64 = 1e-9;

    fn write_csv(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).expect("failed to write test csv");
        path
    }

    #[test]
    fn two_trade_scenario_matches_expected_analytics() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "ok.csv",
            "timestamp,ticker,action,quantity,price,trader_id\n\
             2024-01-01 10:00:00,AAPL,BUY,10,100.0,T1\n\
             2024-01-01 11:00:00,AAPL,SELL,4,110.0,T1\n",
        );

        let mut pipeline = Pipeline::from_path(&path);
        pipeline.load().unwrap();
        assert_eq!(pipeline.clean().unwrap().len(), 2);
        let bundle = pipeline.aggregate().unwrap();

        assert_eq!(bundle.total_transactions, 2);
        assert_eq!(bundle.volume_for("AAPL"), Some(1440.0));
        assert_eq!(bundle.net_position_for("AAPL"), Some(6.0));
    }

    #[test]
    fn all_invalid_rows_leave_an_empty_table_without_failing() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "mixed.csv",
            "timestamp,ticker,action,quantity,price,trader_id\n\
             bad_time,AAPL,BUY,10,100,T1\n\
             2024-01-01 10:00:00,AAPL,HOLD,10,100,T1\n\
             2024-01-01 11:00:00,MSFT,SELL,0,200,T2\n",
        );

        let mut pipeline = Pipeline::from_path(&path);
        assert_eq!(pipeline.load().unwrap().len(), 3);
        assert!(pipeline.clean().unwrap().is_empty());

        let report = pipeline.cleaning_report().unwrap();
        assert_eq!(report.input_rows, 3);
        assert_eq!(report.total_dropped(), 3);
    }

    #[test]
    fn missing_price_column_is_a_schema_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "bad.csv",
            "timestamp,ticker,action,quantity,trader_id\n\
             not even close,,,,\n",
        );

        let mut pipeline = Pipeline::from_path(&path);
        match pipeline.load() {
            Err(PipelineError::Schema(missing)) => assert_eq!(missing, vec!["price"]),
            other => panic!("expected SchemaError, got {other:?}"),
        }
        assert_eq!(pipeline.phase(), PipelinePhase::Uninitialized);
    }

    #[test]
    fn unreadable_file_is_a_source_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut pipeline = Pipeline::from_path(dir.path().join("absent.csv"));
        assert!(matches!(pipeline.load(), Err(PipelineError::Source(_))));
    }

    #[test]
    fn time_range_query_keeps_only_january() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "ok.csv",
            "timestamp,ticker,action,quantity,price,trader_id\n\
             2024-01-01 10:00:00,AAPL,BUY,10,100.0,T1\n\
             2024-02-01 10:00:00,MSFT,BUY,5,200.0,T2\n",
        );

        let mut pipeline = Pipeline::from_path(&path);
        pipeline.load().unwrap();
        pipeline.clean().unwrap();

        assert_eq!(pipeline.by_ticker("aapl").unwrap().len(), 1);
        assert_eq!(pipeline.by_trader("t2").unwrap().len(), 1);

        let january = pipeline.by_time_range("2024-01-01", "2024-01-31").unwrap();
        assert_eq!(january.len(), 1);
        assert_eq!(january[0].ticker, "AAPL");

        assert!(matches!(
            pipeline.by_time_range("yesterday-ish", "2024-01-31"),
            Err(PipelineError::Parse(_))
        ));
    }

    #[test]
    fn extra_columns_and_any_column_order_are_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "shuffled.csv",
            "venue,price,trader_id,ticker,quantity,timestamp,action\n\
             NYSE,100.0, t1 , aapl ,10,2024-01-01 10:00:00, buy \n",
        );

        let (transactions, bundle) = process_transactions(&path).unwrap();

        assert_eq!(transactions.len(), 1);
        let tx = &transactions[0];
        assert_eq!(tx.ticker, "AAPL");
        assert_eq!(tx.trader_id, "T1");
        assert_eq!(tx.action, Action::Buy);
        assert_eq!(tx.total_value, 1000.0);
        assert_eq!(bundle.unique_traders, 1);
    }

    #[test]
    fn aggregate_properties_hold_on_a_mixed_book() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "book.csv",
            "timestamp,ticker,action,quantity,price,trader_id\n\
             2024-03-02 09:00:00,NVDA,SELL,2,880.10,T3\n\
             2024-03-01 09:30:00,AAPL,BUY,10,171.25,T1\n\
             2024-03-01 10:15:00,MSFT,BUY,3,410.50,T2\n\
             2024-03-01 14:00:00,AAPL,SELL,4,172.00,T2\n\
             2024-03-02 11:45:00,MSFT,SELL,1,412.75,T1\n\
             2024-03-03 15:59:59,AAPL,BUY,7.5,169.80,T1\n\
             2024-03-03 16:00:00,TSLA,HOLD,1,200,T4\n",
        );

        let (transactions, bundle) = process_transactions(&path).unwrap();

        assert_eq!(transactions.len(), 6);
        assert!(transactions.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        for tx in &transactions {
            assert!((tx.total_value - tx.quantity * tx.price).abs() < EPSILON);
            assert_eq!(tx.date, tx.timestamp.date());
        }

        let ticker_sum: f64 = bundle.volume_by_ticker.iter().map(|e| e.volume).sum();
        assert!((ticker_sum - bundle.total_volume).abs() < 1e-6);

        let action_sum: usize = bundle.action_counts.iter().map(|e| e.count).sum();
        assert_eq!(action_sum, bundle.total_transactions);

        for entry in &bundle.net_position {
            let expected: f64 = transactions
                .iter()
                .filter(|tx| tx.ticker == entry.ticker)
                .map(|tx| match tx.action {
                    Action::Buy => tx.quantity,
                    Action::Sell => -tx.quantity,
                })
                .sum();
            assert!((entry.quantity - expected).abs() < EPSILON, "{}", entry.ticker);
        }
        assert_eq!(bundle.net_position_for("NVDA"), Some(-2.0));
        assert_eq!(bundle.net_position_for("AAPL"), Some(13.5));

        assert!(bundle
            .volume_by_ticker
            .windows(2)
            .all(|w| w[0].volume >= w[1].volume));
        assert!(bundle
            .daily_volume
            .windows(2)
            .all(|w| w[0].date < w[1].date));
        assert_eq!(bundle.trader_activity[0].trader_id, "T1");
        assert_eq!(bundle.trader_activity[0].transaction_count, 3);
    }

    #[test]
    fn rerunning_stages_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "ok.csv",
            "timestamp,ticker,action,quantity,price,trader_id\n\
             2024-01-02 10:00:00,msft,sell,3,310.5,t2\n\
             2024-01-01 10:00:00,aapl,buy,10,101.25,t1\n",
        );

        let mut pipeline = Pipeline::from_path(&path);
        pipeline.load().unwrap();
        let first_clean = pipeline.clean().unwrap().to_vec();
        let second_clean = pipeline.clean().unwrap().to_vec();
        assert_eq!(first_clean, second_clean);

        let first_bundle = pipeline.aggregate().unwrap().clone();
        let second_bundle = pipeline.aggregate().unwrap().clone();
        assert_eq!(first_bundle, second_bundle);
    }

    #[test]
    fn analyzed_pipeline_serves_concurrent_readers() {
        let mut rows = String::from("timestamp,ticker,action,quantity,price,trader_id\n");
        for i in 0..50 {
            let ticker = if i % 2 == 0 { "AAPL" } else { "MSFT" };
            rows.push_str(&format!("2024-01-{:02} 10:00:00,{ticker},BUY,1,10,T{}\n", i % 28 + 1, i % 5));
        }
        let mut pipeline = Pipeline::from_csv_text(rows);
        pipeline.run().unwrap();
        let shared = &pipeline;

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(move || shared.by_ticker("aapl").unwrap().len()))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), 25);
            }
        });
    }

    #[test]
    fn export_is_valid_json_with_text_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "tx.csv",
            "timestamp,ticker,action,quantity,price,trader_id\n\
             2024-01-01 10:00:00,AAPL,BUY,10,100.0,T1\n\
             2024-01-02 11:00:00,MSFT,SELL,5,200.0,T2\n",
        );

        let mut pipeline = Pipeline::from_path(&path);
        pipeline.run().unwrap();
        let value: serde_json::Value = serde_json::from_str(&pipeline.export_json().unwrap()).unwrap();

        assert_eq!(value["total_transactions"], 2);
        assert_eq!(value["unique_tickers"], 2);
        let daily = value["daily_volume"].as_object().unwrap();
        assert!(daily.contains_key("2024-01-01"));
        assert!(daily.contains_key("2024-01-02"));
    }
}
