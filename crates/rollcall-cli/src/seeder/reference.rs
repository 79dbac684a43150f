//! Specialty, module and teacher seeding.

use fake::Fake;
use fake::faker::company::en::Profession;
use fake::faker::lorem::en::Word;
use fake::faker::name::en::*;
use rayon::prelude::*;
use rollcall_models::ids::{ModuleId, SpecialtyId, TeacherId};
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;

use super::models::{ModuleSeed, SEED_EMAIL_DOMAIN, SEED_MARKER, SpecialtySeed, TeacherSeed};
use super::values_placeholders;

const BATCH_SIZE: usize = 500;

pub fn generate_specialties(count: usize) -> Vec<SpecialtySeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let profession: String = Profession().fake();
            SpecialtySeed {
                name: format!("{} Technician", profession),
                code: format!("SD{}", idx + 1),
                duration_semesters: 4,
            }
        })
        .collect()
}

/// Modules alternate between semesters 1 and 2.
pub fn generate_modules(
    specialties: &[(SpecialtyId, String)],
    modules_per_specialty: usize,
) -> Vec<ModuleSeed> {
    specialties
        .par_iter()
        .flat_map(|(specialty_id, code)| {
            (0..modules_per_specialty)
                .map(|idx| {
                    let topic: String = Word().fake();
                    ModuleSeed {
                        specialty_id: *specialty_id,
                        code: format!("{}-M{:02}", code, idx + 1),
                        name: format!("Introduction to {}", topic),
                        semester: 1 + (idx % 2) as i32,
                        hours_per_week: 3,
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

pub fn generate_teachers(count: usize) -> Vec<TeacherSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let first_name: String = FirstName().fake();
            let last_name: String = LastName().fake();
            let email = format!(
                "{}.{}+teacher{}@{}",
                first_name.to_lowercase(),
                last_name.to_lowercase(),
                idx,
                SEED_EMAIL_DOMAIN
            );
            TeacherSeed {
                first_name,
                last_name,
                email,
            }
        })
        .collect()
}

pub async fn seed_specialties(
    db: &PgPool,
    count: usize,
) -> Result<Vec<(SpecialtyId, String)>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🏫 Seeding {} specialties...", count);

    let specialties = generate_specialties(count);
    let mut tx = db.begin().await?;
    let mut inserted = Vec::with_capacity(specialties.len());
    for chunk in specialties.chunks(BATCH_SIZE) {
        inserted.extend(insert_specialties_chunk(&mut tx, chunk).await?);
    }
    tx.commit().await?;

    println!(
        "   ✓ Inserted {} specialties in {:?}",
        inserted.len(),
        start_time.elapsed()
    );
    Ok(inserted)
}

async fn insert_specialties_chunk(
    tx: &mut Transaction<'_, Postgres>,
    specialties: &[SpecialtySeed],
) -> Result<Vec<(SpecialtyId, String)>, Box<dyn std::error::Error>> {
    if specialties.is_empty() {
        return Ok(Vec::new());
    }

    let query = format!(
        "INSERT INTO specialties (name, code, duration_semesters, description) VALUES {} RETURNING id, code",
        values_placeholders(specialties.len(), 4)
    );

    let mut q = sqlx::query_as::<_, (SpecialtyId, String)>(&query);
    for specialty in specialties {
        q = q
            .bind(&specialty.name)
            .bind(&specialty.code)
            .bind(specialty.duration_semesters)
            .bind(SEED_MARKER);
    }

    Ok(q.fetch_all(&mut **tx).await?)
}

pub async fn seed_modules(
    db: &PgPool,
    specialties: &[(SpecialtyId, String)],
    modules_per_specialty: usize,
) -> Result<Vec<(ModuleId, SpecialtyId, i32)>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!(
        "📘 Seeding {} modules per specialty...",
        modules_per_specialty
    );

    let modules = generate_modules(specialties, modules_per_specialty);
    let mut tx = db.begin().await?;
    let mut inserted = Vec::with_capacity(modules.len());

    for chunk in modules.chunks(BATCH_SIZE) {
        let query = format!(
            "INSERT INTO modules (specialty_id, code, name, semester, hours_per_week) VALUES {} \
             RETURNING id, specialty_id, semester",
            values_placeholders(chunk.len(), 5)
        );
        let mut q = sqlx::query_as::<_, (ModuleId, SpecialtyId, i32)>(&query);
        for module in chunk {
            q = q
                .bind(module.specialty_id)
                .bind(&module.code)
                .bind(&module.name)
                .bind(module.semester)
                .bind(module.hours_per_week);
        }
        inserted.extend(q.fetch_all(&mut *tx).await?);
    }
    tx.commit().await?;

    println!(
        "   ✓ Inserted {} modules in {:?}",
        inserted.len(),
        start_time.elapsed()
    );
    Ok(inserted)
}

pub async fn seed_teachers(
    db: &PgPool,
    count: usize,
) -> Result<Vec<TeacherId>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("👩‍🏫 Seeding {} teachers...", count);

    let teachers = generate_teachers(count);
    let mut tx = db.begin().await?;
    let mut inserted = Vec::with_capacity(teachers.len());

    for chunk in teachers.chunks(BATCH_SIZE) {
        let query = format!(
            "INSERT INTO teachers (first_name, last_name, email) VALUES {} RETURNING id",
            values_placeholders(chunk.len(), 3)
        );
        let mut q = sqlx::query_scalar::<_, TeacherId>(&query);
        for teacher in chunk {
            q = q
                .bind(&teacher.first_name)
                .bind(&teacher.last_name)
                .bind(&teacher.email);
        }
        inserted.extend(q.fetch_all(&mut *tx).await?);
    }
    tx.commit().await?;

    println!(
        "   ✓ Inserted {} teachers in {:?}",
        inserted.len(),
        start_time.elapsed()
    );
    Ok(inserted)
}
