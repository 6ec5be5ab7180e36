use backend_domain::{DatasetSummary, FilterOptions, BUYER_COLUMN, YEAR_COLUMN};

use crate::AppState;

pub async fn list_numeric_columns(state: &AppState) -> Vec<String> {
    state.snapshot().await.dataset.numeric_columns()
}

pub async fn list_filter_options(state: &AppState) -> FilterOptions {
    let snapshot = state.snapshot().await;
    FilterOptions {
        buyers: snapshot.dataset.distinct_text(BUYER_COLUMN),
        years: snapshot.dataset.distinct_years(YEAR_COLUMN),
    }
}

pub async fn dataset_summary(state: &AppState) -> DatasetSummary {
    let snapshot = state.snapshot().await;
    DatasetSummary {
        source: snapshot.source.clone(),
        rows: snapshot.dataset.len(),
        columns: snapshot.dataset.columns().to_vec(),
        numeric_columns: snapshot.dataset.numeric_columns(),
        loaded_at: snapshot.loaded_at,
    }
}
