//! Demo-data seeder: two stages with their weekly slot grid, teachers,
//! subjects, rooms and class groups, plus one secretary account. Safe to
//! run repeatedly; every insert skips rows that already exist.

use sqlx::PgPool;
use uuid::Uuid;

use crate::modules::users::model::UserRole;

/// Seeded accounts all share this password. Demo data only.
const SEED_PASSWORD: &str = "changeme123";

/// Bcrypt cost for seeded accounts, lower than the runtime default to
/// keep seeding fast.
const SEED_BCRYPT_COST: u32 = 4;

const SLOT_GRID: [(&str, &str); 5] = [
    ("08:00", "09:00"),
    ("09:00", "10:00"),
    ("10:15", "11:15"),
    ("11:15", "12:15"),
    ("13:15", "14:15"),
];

const WEEKDAYS: [&str; 5] = ["monday", "tuesday", "wednesday", "thursday", "friday"];

const MIDDLE_TEACHERS: [(&str, &str); 4] = [
    ("Alice", "Johnson"),
    ("Bob", "Smith"),
    ("Carol", "White"),
    ("David", "Green"),
];

const HIGH_TEACHERS: [(&str, &str); 5] = [
    ("Emily", "Brown"),
    ("Frank", "Adams"),
    ("Grace", "Lee"),
    ("Henry", "Wilson"),
    ("Ivy", "Clark"),
];

const MIDDLE_SUBJECTS: [&str; 5] = ["Maths", "Art", "English", "Science", "History"];
const HIGH_SUBJECTS: [&str; 6] = ["Maths", "English", "Physics", "Chemistry", "History", "Biology"];

const MIDDLE_ROOMS: [&str; 3] = ["Room 101", "Room 102", "Room 103"];
const HIGH_ROOMS: [&str; 4] = ["Room 201", "Room 202", "Room 203", "Room 204"];

const MIDDLE_GROUPS: [&str; 3] = ["6A", "6B", "7A"];
const HIGH_GROUPS: [&str; 4] = ["10A", "10B", "11A", "11B"];

fn seed_username(first: &str, last: &str) -> String {
    format!("{}.{}", first.to_lowercase(), last.to_lowercase())
}

pub async fn seed_database(db: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    println!("🌱 Seeding demo data...");

    let password_hash = bcrypt::hash(SEED_PASSWORD, SEED_BCRYPT_COST)?;

    let middle = get_or_create_stage(db, "Middle School").await?;
    let high = get_or_create_stage(db, "High School").await?;
    println!("   ✓ Stages");

    for stage_id in [middle, high] {
        for day in WEEKDAYS {
            for (start, end) in SLOT_GRID {
                sqlx::query(
                    "INSERT INTO timeslots (stage_id, day, start_time, end_time)
                     VALUES ($1, $2::weekday, $3::time, $4::time)
                     ON CONFLICT ON CONSTRAINT uq_timeslots_stage_day_times DO NOTHING",
                )
                .bind(stage_id)
                .bind(day)
                .bind(start)
                .bind(end)
                .execute(db)
                .await?;
            }
        }
    }
    println!("   ✓ Time slots");

    for (stage_id, teachers) in [
        (middle, &MIDDLE_TEACHERS[..]),
        (high, &HIGH_TEACHERS[..]),
    ] {
        for (first, last) in teachers {
            let user_id =
                get_or_create_user(db, &seed_username(first, last), first, last, UserRole::Teacher, &password_hash)
                    .await?;

            sqlx::query(
                "INSERT INTO teachers (user_id, stage_id) VALUES ($1, $2)
                 ON CONFLICT (user_id) DO NOTHING",
            )
            .bind(user_id)
            .bind(stage_id)
            .execute(db)
            .await?;
        }
    }
    println!("   ✓ Teachers");

    for (stage_id, table, names) in [
        (middle, "subjects", &MIDDLE_SUBJECTS[..]),
        (high, "subjects", &HIGH_SUBJECTS[..]),
        (middle, "rooms", &MIDDLE_ROOMS[..]),
        (high, "rooms", &HIGH_ROOMS[..]),
        (middle, "class_groups", &MIDDLE_GROUPS[..]),
        (high, "class_groups", &HIGH_GROUPS[..]),
    ] {
        for name in names {
            sqlx::query(&format!(
                "INSERT INTO {table} (stage_id, name) VALUES ($1, $2)
                 ON CONFLICT (stage_id, name) DO NOTHING"
            ))
            .bind(stage_id)
            .bind(name)
            .execute(db)
            .await?;
        }
    }
    println!("   ✓ Subjects, rooms and class groups");

    get_or_create_user(
        db,
        "secretary",
        "Sam",
        "Ortiz",
        UserRole::Secretary,
        &password_hash,
    )
    .await?;
    println!("   ✓ Secretary account");

    println!("✅ Database seeded successfully!");
    println!("   Seeded accounts use the password: {}", SEED_PASSWORD);

    Ok(())
}

/// Removes the seeded stages (their catalogs, slots, teacher records and
/// lessons go with them) and the seeded accounts. Admin accounts are
/// never touched.
pub async fn clear_seeded_data(db: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    println!("🧹 Clearing seeded data...");

    sqlx::query("DELETE FROM stages WHERE name IN ('Middle School', 'High School')")
        .execute(db)
        .await?;

    let mut usernames: Vec<String> = MIDDLE_TEACHERS
        .iter()
        .chain(HIGH_TEACHERS.iter())
        .map(|(first, last)| seed_username(first, last))
        .collect();
    usernames.push("secretary".to_string());

    sqlx::query("DELETE FROM users WHERE username = ANY($1) AND role <> 'admin'")
        .bind(&usernames)
        .execute(db)
        .await?;

    println!("✅ Seeded data cleared (admin accounts kept).");

    Ok(())
}

async fn get_or_create_stage(db: &PgPool, name: &str) -> Result<Uuid, sqlx::Error> {
    sqlx::query("INSERT INTO stages (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
        .bind(name)
        .execute(db)
        .await?;

    sqlx::query_scalar("SELECT id FROM stages WHERE name = $1")
        .bind(name)
        .fetch_one(db)
        .await
}

async fn get_or_create_user(
    db: &PgPool,
    username: &str,
    first_name: &str,
    last_name: &str,
    role: UserRole,
    password_hash: &str,
) -> Result<Uuid, sqlx::Error> {
    sqlx::query(
        "INSERT INTO users (username, first_name, last_name, password, role)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT (username) DO NOTHING",
    )
    .bind(username)
    .bind(first_name)
    .bind(last_name)
    .bind(password_hash)
    .bind(role)
    .execute(db)
    .await?;

    sqlx::query_scalar("SELECT id FROM users WHERE username = $1")
        .bind(username)
        .fetch_one(db)
        .await
}
