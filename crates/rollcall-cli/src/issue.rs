//! Offline registration number issuing.
//!
//! Follows the same rules as the API: numbers are `<CODE><YEAR><NNN>`, the
//! sequence continues after the highest suffix already issued for the
//! prefix, and concurrent issuers serialize on an advisory lock. The SQL is
//! shared with the API through `insert_next_numbers`.

use chrono::Utc;
use rollcall_models::ids::SpecialtyId;
use rollcall_models::registration_numbers::{
    MAX_BULK_COUNT, academic_year_label, insert_next_numbers,
};
use sqlx::PgPool;
use std::time::Instant;

/// Numbers issued for one specialty.
pub struct IssuedNumbers {
    pub specialty_name: String,
    pub academic_year: String,
    pub numbers: Vec<String>,
}

/// Issues `count` consecutive numbers for the specialty with `code`.
pub async fn issue_numbers(
    db: &PgPool,
    code: &str,
    count: u32,
    year: i32,
) -> Result<IssuedNumbers, Box<dyn std::error::Error>> {
    if count == 0 || i64::from(count) > i64::from(MAX_BULK_COUNT) {
        return Err(format!("count must be between 1 and {}", MAX_BULK_COUNT).into());
    }

    let start_time = Instant::now();
    let mut tx = db.begin().await?;

    let (specialty_id, specialty_name, specialty_code) =
        sqlx::query_as::<_, (SpecialtyId, String, String)>(
            "SELECT id, name, code FROM specialties WHERE upper(code) = upper($1)",
        )
        .bind(code)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| format!("No specialty with code {}", code))?;

    let numbers: Vec<String> =
        insert_next_numbers(&mut tx, specialty_id, &specialty_code, year, count, Utc::now())
            .await?
            .into_iter()
            .map(|n| n.number)
            .collect();

    tx.commit().await?;

    println!(
        "   ✓ Issued {} numbers for {} in {:?}",
        numbers.len(),
        specialty_name,
        start_time.elapsed()
    );

    Ok(IssuedNumbers {
        specialty_name,
        academic_year: academic_year_label(year),
        numbers,
    })
}
