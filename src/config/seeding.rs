use anyhow::Result;
use chrono::{NaiveDate, Utc};

use crate::auth::hash_password;
use crate::models::*;
use crate::store::{Collection, Database, SharedDatabase};

pub const DEMO_ADMIN_PASSWORD: &str = "adminPassword123";
pub const DEMO_INSTRUCTOR_PASSWORD: &str = "instructorPassword123";
pub const DEMO_STUDENT_PASSWORD: &str = "studentPassword123";

struct DemoUser {
    document: &'static str,
    full_name: &'static str,
    email: &'static str,
    role: Role,
    password: &'static str,
}

const DEMO_USERS: &[DemoUser] = &[
    DemoUser {
        document: "111.111.111-11",
        full_name: "Admin Master",
        email: "admin@app.com",
        role: Role::Admin,
        password: DEMO_ADMIN_PASSWORD,
    },
    DemoUser {
        document: "222.222.222-22",
        full_name: "Carlos Personal",
        email: "instructor@app.com",
        role: Role::Instructor,
        password: DEMO_INSTRUCTOR_PASSWORD,
    },
    DemoUser {
        document: "333.333.333-33",
        full_name: "João Aluno",
        email: "student@app.com",
        role: Role::Student,
        password: DEMO_STUDENT_PASSWORD,
    },
    DemoUser {
        document: "444.444.444-44",
        full_name: "Maria Aluna",
        email: "maria@app.com",
        role: Role::Student,
        password: DEMO_STUDENT_PASSWORD,
    },
];

fn date(value: &str) -> Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(value, "%Y-%m-%d")?)
}

/// Loads the demo dataset into an empty store
pub struct DatabaseSeeder {
    db: SharedDatabase,
    bcrypt_cost: u32,
}

impl DatabaseSeeder {
    pub fn new(db: SharedDatabase, bcrypt_cost: u32) -> Self {
        Self { db, bcrypt_cost }
    }

    pub async fn seed_all(&self) -> Result<()> {
        tracing::info!("Starting database seeding...");

        let mut db = self.db.write().await;
        if !db.users.is_empty() {
            tracing::info!("Store already holds data, skipping seeding");
            return Ok(());
        }

        self.seed_users(&mut db)?;
        Self::seed_catalog(&mut db);
        Self::seed_workout_plans(&mut db)?;
        Self::seed_sessions(&mut db)?;

        tracing::info!(
            users = db.users.len(),
            exercises = db.exercises.len(),
            modifiers = db.modifiers.len(),
            workout_plans = db.workout_plans.len(),
            sessions = db.sessions.len(),
            "Database seeding completed!"
        );
        Ok(())
    }

    fn seed_users(&self, db: &mut Database) -> Result<()> {
        let now = Utc::now();

        for demo in DEMO_USERS {
            let user = User {
                id: db.next_id(Collection::Users),
                document: demo.document.to_string(),
                full_name: demo.full_name.to_string(),
                email: demo.email.to_string(),
                role: demo.role,
                password_hash: hash_password(demo.password, self.bcrypt_cost)?,
                status: UserStatus::Active,
                created_at: now,
                updated_at: now,
            };
            tracing::debug!(user_id = user.id, role = %user.role, "Created demo user");
            db.users.push(user);
        }

        db.instructor_profiles.push(InstructorProfile {
            user_id: 2,
            cref: "123456-G/SP".to_string(),
            specialization: Some("Strength and conditioning".to_string()),
            bio: Some("Ten years coaching strength athletes.".to_string()),
        });
        db.student_profiles.push(StudentProfile {
            user_id: 3,
            height: Some(178.0),
            weight: Some(75.5),
            date_of_birth: Some(date("1998-04-12")?),
            instructor_id: Some(2),
        });
        db.student_profiles.push(StudentProfile {
            user_id: 4,
            height: Some(165.0),
            weight: Some(60.0),
            date_of_birth: Some(date("2000-09-30")?),
            instructor_id: Some(2),
        });

        Ok(())
    }

    fn seed_catalog(db: &mut Database) {
        let now = Utc::now();

        let exercises = [
            ("Barbell Bench Press", "Chest", "Keep the shoulder blades retracted."),
            ("Back Squat", "Legs", "Break parallel while keeping a neutral spine."),
            ("Bent-Over Row", "Back", "Pull the bar towards the lower ribs."),
        ];
        for (name, category, observation) in exercises {
            let exercise = Exercise {
                id: db.next_id(Collection::Exercises),
                name: name.to_string(),
                description: None,
                general_observation: Some(observation.to_string()),
                muscle_category: category.to_string(),
                video_link: None,
                created_at: now,
                updated_at: now,
            };
            db.exercises.push(exercise);
        }

        let modifiers = [
            ("Warm Up Set", "Light set to prepare the movement."),
            ("Work Set", "Main working set at the prescribed load."),
            ("Drop Set", "Reduce the load and continue without rest."),
        ];
        for (name, description) in modifiers {
            let modifier = Modifier {
                id: db.next_id(Collection::Modifiers),
                name: name.to_string(),
                description: Some(description.to_string()),
                created_at: now,
                updated_at: now,
            };
            db.modifiers.push(modifier);
        }
    }

    fn seed_workout_plans(db: &mut Database) -> Result<()> {
        let now = Utc::now();

        let item = |id: i64, exercise_id: i64, order_index: i32, modifier_ids: Vec<i64>| WorkoutPlanItem {
            id,
            exercise_id,
            series_count: 4,
            repetitions_expected: "8-12".to_string(),
            load_suggested: "50kg".to_string(),
            observations: None,
            order_index,
            modifier_ids,
        };

        db.workout_plans.push(WorkoutPlan {
            id: 1,
            name: "Upper Body Hypertrophy".to_string(),
            description: Some("Push and pull focus for João.".to_string()),
            instructor_id: 2,
            student_id: 3,
            start_date: date("2024-05-01")?,
            end_date: date("2024-07-31")?,
            items: vec![item(1, 1, 1, vec![]), item(2, 3, 2, vec![2])],
            created_at: now,
            updated_at: now,
        });
        db.workout_plans.push(WorkoutPlan {
            id: 2,
            name: "Lower Body Strength".to_string(),
            description: Some("Squat progression for Maria.".to_string()),
            instructor_id: 2,
            student_id: 4,
            start_date: date("2024-05-15")?,
            end_date: date("2024-08-15")?,
            items: vec![item(3, 2, 1, vec![1, 2])],
            created_at: now,
            updated_at: now,
        });

        Ok(())
    }

    fn seed_sessions(db: &mut Database) -> Result<()> {
        let now = Utc::now();

        let execution = |id: i64, exercise_id: i64, modifier_ids: Vec<i64>| Execution {
            id,
            exercise_id,
            series_completed: 4,
            repetitions_completed: "10,10,9,8".to_string(),
            load_used: "45kg".to_string(),
            observations: None,
            modifier_ids,
            created_at: now,
            updated_at: now,
        };

        db.sessions.push(Session {
            id: 1,
            student_id: 3,
            workout_plan_id: Some(1),
            session_date: date("2024-05-02")?,
            observations: Some("Chest day, good pump.".to_string()),
            executions: vec![execution(1, 1, vec![2])],
            created_at: now,
            updated_at: now,
        });
        db.sessions.push(Session {
            id: 2,
            student_id: 4,
            workout_plan_id: Some(2),
            session_date: date("2024-05-16")?,
            observations: None,
            executions: vec![execution(2, 2, vec![1])],
            created_at: now,
            updated_at: now,
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verify_password;

    #[tokio::test]
    async fn test_seed_all_is_consistent() {
        let db = Database::empty().shared();
        let seeder = DatabaseSeeder::new(db.clone(), 4);
        seeder.seed_all().await.unwrap();
        // Second run is a no-op
        seeder.seed_all().await.unwrap();

        let db = db.read().await;
        assert_eq!(db.users.len(), 4);
        assert_eq!(db.exercises.len(), 3);
        assert_eq!(db.modifiers.len(), 3);
        assert!(db.is_instructor_of(2, 3));
        assert!(db.is_instructor_of(2, 4));
        assert_eq!(db.instructor_profile(2).map(|p| p.cref.as_str()), Some("123456-G/SP"));

        for plan in &db.workout_plans {
            assert!(plan.end_date >= plan.start_date);
            for item in &plan.items {
                assert!(db.exercise(item.exercise_id).is_some());
                assert!(db.ensure_modifiers(&item.modifier_ids).is_ok());
            }
        }
        for session in &db.sessions {
            let plan = session.workout_plan_id.and_then(|id| db.workout_plan(id)).unwrap();
            assert_eq!(plan.student_id, session.student_id);
        }

        let admin = db.user(1).unwrap();
        assert!(verify_password(DEMO_ADMIN_PASSWORD, &admin.password_hash).unwrap());
    }
}
