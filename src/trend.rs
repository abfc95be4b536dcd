//! Views derived from a snapshot: the combined daily trend and the
//! top-N category ranking.

use std::collections::BTreeMap;

use crate::models::{CategoryCount, DailyCount, RankedCategory, TrendPoint};

/// Outer-join three daily series on their day key and sum each one's
/// contribution per day.
///
/// The result holds exactly the union of the input days, sorted ascending.
/// A series without an entry for a day contributes `0` to that row.
pub fn merge(
    products: &[DailyCount],
    contacts: &[DailyCount],
    newsletters: &[DailyCount],
) -> Vec<TrendPoint> {
    let mut rows: BTreeMap<String, TrendPoint> = BTreeMap::new();

    let columns: [(&[DailyCount], Column); 3] = [
        (products, Column::Products),
        (contacts, Column::Contacts),
        (newsletters, Column::Newsletters),
    ];

    for (series, column) in columns {
        for point in series {
            let row = rows
                .entry(point.date.clone())
                .or_insert_with(|| TrendPoint {
                    date: point.date.clone(),
                    products: 0,
                    contacts: 0,
                    newsletters: 0,
                });
            *column.of(row) += point.count;
        }
    }

    rows.into_values().collect()
}

#[derive(Clone, Copy)]
enum Column {
    Products,
    Contacts,
    Newsletters,
}

impl Column {
    fn of(self, row: &mut TrendPoint) -> &mut usize {
        match self {
            Column::Products => &mut row.products,
            Column::Contacts => &mut row.contacts,
            Column::Newsletters => &mut row.newsletters,
        }
    }
}

/// The `n` categories with the most products, largest first.
///
/// Ties keep the distribution's first-seen order. `share` is each count
/// over `total_products`, or `0.0` when there are no products.
pub fn top_categories(
    distribution: &[CategoryCount],
    n: usize,
    total_products: usize,
) -> Vec<RankedCategory> {
    let mut ranked: Vec<&CategoryCount> = distribution.iter().collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.count.cmp(&a.count));

    ranked
        .into_iter()
        .take(n)
        .enumerate()
        .map(|(i, c)| RankedCategory {
            rank: i + 1,
            category: c.category.clone(),
            count: c.count,
            share: share_of(c.count, total_products),
        })
        .collect()
}

fn share_of(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}
