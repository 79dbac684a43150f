//! Database seeding for development and demos.
//!
//! # Module Structure
//!
//! - [`reference`] - Specialties, modules and teachers
//! - [`students`] - Students with their consumed registration numbers
//! - [`schedules`] - Weekly templates laid out without slot conflicts
//! - [`models`] - Seed records and [`SeedConfig`]
//!
//! Seeded rows are recognisable afterwards: specialties carry
//! [`models::SEED_MARKER`] as their description and every person's email is
//! on [`models::SEED_EMAIL_DOMAIN`]. [`clear_all`] removes exactly those.
//!
//! Generation runs in parallel with Rayon; inserts are batched multi-row
//! statements inside one transaction per entity.

pub mod models;
pub mod reference;
pub mod schedules;
pub mod students;

pub use models::SeedConfig;

use models::{SEED_EMAIL_DOMAIN, SEED_MARKER};
use sqlx::PgPool;
use std::time::Instant;

/// `"($1, $2), ($3, $4)"` for two rows of two columns.
pub(crate) fn values_placeholders(rows: usize, cols: usize) -> String {
    (0..rows)
        .map(|row| {
            let params: Vec<String> = (1..=cols)
                .map(|col| format!("${}", row * cols + col))
                .collect();
            format!("({})", params.join(", "))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Seeds specialties, modules, teachers, students and schedules.
pub async fn seed_all(db: &PgPool, config: SeedConfig) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();

    println!("🌱 Starting full database seeding...");
    println!(
        "   - Specialties: {}, modules per specialty: {}",
        config.specialties, config.modules_per_specialty
    );
    println!(
        "   - Teachers: {}, students per specialty: {}",
        config.teachers, config.students_per_specialty
    );

    let specialties = reference::seed_specialties(db, config.specialties).await?;
    let modules = reference::seed_modules(db, &specialties, config.modules_per_specialty).await?;
    let teachers = reference::seed_teachers(db, config.teachers).await?;
    let student_count = students::seed_students(
        db,
        &specialties,
        config.students_per_specialty,
        config.year,
    )
    .await?;
    let schedule_count = schedules::seed_schedules(db, &modules, &teachers, config.year).await?;

    println!(
        "\n✅ Seeding complete! Created {} specialties, {} modules, {} teachers, {} students, {} schedules in {:?}",
        specialties.len(),
        modules.len(),
        teachers.len(),
        student_count,
        schedule_count,
        start_time.elapsed()
    );

    Ok(())
}

/// Removes everything the seeder created.
///
/// Students do not cascade from specialties, so they go first together with
/// their attendance. Modules, schedules and registration numbers cascade.
pub async fn clear_all(db: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗑️  Clearing all seeded data...");

    let email_pattern = format!("%@{}", SEED_EMAIL_DOMAIN);
    let mut tx = db.begin().await?;

    let students = sqlx::query(
        r#"DELETE FROM students
           WHERE email LIKE $1
              OR specialty_id IN (SELECT id FROM specialties WHERE description = $2)"#,
    )
    .bind(&email_pattern)
    .bind(SEED_MARKER)
    .execute(&mut *tx)
    .await?
    .rows_affected();
    println!("   ✓ Removed {} students", students);

    let specialties = sqlx::query("DELETE FROM specialties WHERE description = $1")
        .bind(SEED_MARKER)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    println!("   ✓ Removed {} specialties", specialties);

    let teachers = sqlx::query("DELETE FROM teachers WHERE email LIKE $1")
        .bind(&email_pattern)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    println!("   ✓ Removed {} teachers", teachers);

    tx.commit().await?;

    println!("✅ All seeded data cleared in {:?}", start_time.elapsed());
    Ok(())
}
