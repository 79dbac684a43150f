//! Student seeding.
//!
//! Every seeded student holds a registration number issued for their
//! specialty; the number row is inserted already used.

use fake::Fake;
use fake::faker::name::en::*;
use rayon::prelude::*;
use rollcall_models::StudyMode;
use rollcall_models::ids::SpecialtyId;
use rollcall_models::registration_numbers::{academic_year_label, format_number, number_prefix};
use sqlx::PgPool;
use std::time::Instant;

use super::models::{SEED_EMAIL_DOMAIN, StudentSeed};
use super::values_placeholders;

const BATCH_SIZE: usize = 500;
const GROUPS: [&str; 2] = ["G1", "G2"];

/// Students of one specialty numbered from 1; half of them in each group.
pub fn generate_students(
    specialty_id: SpecialtyId,
    code: &str,
    year: i32,
    count: usize,
) -> Vec<StudentSeed> {
    let prefix = number_prefix(code, year);

    (0..count)
        .into_par_iter()
        .map(|idx| {
            let first_name: String = FirstName().fake();
            let last_name: String = LastName().fake();
            let sequence = u32::try_from(idx + 1).unwrap_or(u32::MAX);
            let registration_number = format_number(&prefix, sequence);
            let email = format!(
                "{}.{}+{}@{}",
                first_name.to_lowercase(),
                last_name.to_lowercase(),
                registration_number.to_lowercase(),
                SEED_EMAIL_DOMAIN
            );

            StudentSeed {
                specialty_id,
                registration_number,
                first_name,
                last_name,
                email,
                study_mode: StudyMode::Initial,
                group: Some(GROUPS[idx % GROUPS.len()].to_string()),
            }
        })
        .collect()
}

pub async fn seed_students(
    db: &PgPool,
    specialties: &[(SpecialtyId, String)],
    students_per_specialty: usize,
    year: i32,
) -> Result<usize, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!(
        "🎓 Seeding {} students per specialty...",
        students_per_specialty
    );

    let academic_year = academic_year_label(year);
    let students: Vec<StudentSeed> = specialties
        .iter()
        .flat_map(|(specialty_id, code)| {
            generate_students(*specialty_id, code, year, students_per_specialty)
        })
        .collect();

    let mut tx = db.begin().await?;
    for chunk in students.chunks(BATCH_SIZE) {
        let numbers: Vec<&str> = chunk.iter().map(|s| s.registration_number.as_str()).collect();
        let specialty_ids: Vec<SpecialtyId> = chunk.iter().map(|s| s.specialty_id).collect();
        sqlx::query(
            r#"INSERT INTO registration_numbers (number, specialty_id, academic_year, is_used, used_at)
               SELECT n, s, $1, TRUE, NOW() FROM UNNEST($2::text[], $3::uuid[]) AS t(n, s)"#,
        )
        .bind(&academic_year)
        .bind(&numbers)
        .bind(&specialty_ids)
        .execute(&mut *tx)
        .await?;

        let query = format!(
            "INSERT INTO students (specialty_id, registration_number, first_name, last_name, email, \
             study_mode, group_name, current_semester, is_approved) VALUES {}",
            values_placeholders(chunk.len(), 9)
        );
        let mut q = sqlx::query(&query);
        for student in chunk {
            q = q
                .bind(student.specialty_id)
                .bind(&student.registration_number)
                .bind(&student.first_name)
                .bind(&student.last_name)
                .bind(&student.email)
                .bind(student.study_mode)
                .bind(&student.group)
                .bind(1_i32)
                .bind(true);
        }
        q.execute(&mut *tx).await?;
    }
    tx.commit().await?;

    println!(
        "   ✓ Inserted {} students in {:?}",
        students.len(),
        start_time.elapsed()
    );
    Ok(students.len())
}
