//! Prices to statistics without the network.

use approx::assert_abs_diff_eq;
use chrono::{NaiveDate, Utc};
use ndarray::Array2;
use portsim_data::{
    DataError, InMemoryStatisticsProvider, ReturnHistory, ReturnStatistics,
    ReturnStatisticsProvider,
};
use portsim_risk::CovarianceMethod;
use portsim_risk::covariance::cholesky;
use rstest::rstest;

fn synthetic_prices(days: usize) -> (Vec<NaiveDate>, Array2<f64>) {
    let start = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
    let dates = (0..days)
        .map(|i| start + chrono::Duration::days(i as i64))
        .collect();
    let mut prices = Array2::zeros((days, 3));
    let mut level = [100.0, 40.0, 250.0];
    for t in 0..days {
        let a = (((t * 37) % 17) as f64 - 8.0) / 400.0;
        let b = (((t * 11) % 13) as f64 - 6.0) / 300.0;
        let c = (((t * 5) % 7) as f64 - 3.0) / 500.0;
        level[0] *= 1.0 + a;
        level[1] *= 1.0 + 0.5 * a + b + c;
        level[2] *= 1.0 + b;
        for (j, value) in level.iter().enumerate() {
            prices[[t, j]] = *value;
        }
    }
    (dates, prices)
}

fn symbols() -> Vec<String> {
    vec!["TSM".into(), "AAPL".into(), "^N225".into()]
}

#[rstest]
#[case(CovarianceMethod::Sample)]
#[case(CovarianceMethod::Ewma { decay: 0.94 })]
fn test_statistics_are_factorisable(#[case] method: CovarianceMethod) {
    let (dates, prices) = synthetic_prices(120);
    let history = ReturnHistory::from_prices(symbols(), dates, &prices).unwrap();
    assert_eq!(history.n_observations(), 119);

    let stats = ReturnStatistics::from_history(&history, &method).unwrap();
    assert_eq!(stats.symbols(), symbols().as_slice());
    assert!(cholesky(stats.covariance()).is_ok());

    let corr = stats.correlation().unwrap();
    for i in 0..3 {
        assert_abs_diff_eq!(corr[[i, i]], 1.0, epsilon = 1e-12);
    }
}

#[test]
fn test_mean_matches_pct_change_average() {
    let (dates, prices) = synthetic_prices(30);
    let history = ReturnHistory::from_prices(symbols(), dates, &prices).unwrap();
    let stats = ReturnStatistics::from_history(&history, &CovarianceMethod::Sample).unwrap();

    let expected: f64 = (1..30)
        .map(|t| prices[[t, 2]] / prices[[t - 1, 2]] - 1.0)
        .sum::<f64>()
        / 29.0;
    assert_abs_diff_eq!(stats.mean_returns()[2], expected, epsilon = 1e-14);
}

#[test]
fn test_single_return_is_insufficient() {
    let (dates, prices) = synthetic_prices(2);
    let result = ReturnHistory::from_prices(symbols(), dates, &prices);
    assert!(matches!(
        result,
        Err(DataError::InsufficientHistory {
            required: 2,
            actual: 1
        })
    ));
}

#[tokio::test]
async fn test_in_memory_provider_serves_history_statistics() {
    let (dates, prices) = synthetic_prices(60);
    let history = ReturnHistory::from_prices(symbols(), dates, &prices).unwrap();
    let stats = ReturnStatistics::from_history(&history, &CovarianceMethod::Sample).unwrap();
    let provider = InMemoryStatisticsProvider::new(stats.clone());

    let now = Utc::now();
    let served = provider.fetch_statistics(&symbols(), now, now).await.unwrap();
    assert_eq!(served.mean_returns(), stats.mean_returns());
    assert_eq!(served.covariance(), stats.covariance());
}
