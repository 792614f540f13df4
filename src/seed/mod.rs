use anyhow::Result;

use crate::logic::{EnsembleService, PostService, UserService};
use crate::model::{AuthUser, NewEnsemble, NewInstrument, NewPost, NewUser};
use crate::store::traits::Store;

struct SeedMusician {
    username: &'static str,
    full_name: &'static str,
    description: &'static str,
    instrument: &'static str,
    genres: &'static [&'static str],
}

const MUSICIANS: &[SeedMusician] = &[
    SeedMusician {
        username: "clara_strings",
        full_name: "Clara Lund",
        description: "Violinist looking for a string quartet",
        instrument: "Violin",
        genres: &["Classical", "Baroque"],
    },
    SeedMusician {
        username: "miles_low",
        full_name: "Miles Berg",
        description: "Upright bass, mostly jazz standards",
        instrument: "Double Bass",
        genres: &["Jazz", "Blues"],
    },
    SeedMusician {
        username: "ada_keys",
        full_name: "Ada Holm",
        description: "Pianist and occasional organist",
        instrument: "Piano",
        genres: &["Jazz", "Classical"],
    },
];

const SEED_PASSWORD: &str = "bandstand";
const SEED_ENSEMBLE: &str = "Harbour Street Trio";

/// Load a small demo data set through the services.
///
/// Skipped when the seed ensemble already exists.
pub async fn load_seed_data<S: Store>(store: &S) -> Result<()> {
    if store.find_ensemble_by_name(SEED_ENSEMBLE).await?.is_some() {
        log::info!("Seed data already present, skipping");
        return Ok(());
    }

    let mut members = Vec::with_capacity(MUSICIANS.len());
    for musician in MUSICIANS {
        members.push(seed_musician(store, musician).await?);
    }

    let ensemble = EnsembleService::create(
        store,
        NewEnsemble {
            name: Some(SEED_ENSEMBLE.to_string()),
            description: Some("Piano trio playing Sunday brunches".to_string()),
            genre: Some(vec!["Jazz".to_string()]),
        },
    )
    .await?;

    for member in members.iter().skip(1) {
        EnsembleService::link_user(store, &ensemble.id, member).await?;
    }

    if let Some(author) = members.first() {
        PostService::create(
            store,
            NewPost {
                title: Some("Looking for a cellist".to_string()),
                description: Some("Forming a string quartet, rehearsals on weekends".to_string()),
                genre: Some("Classical".to_string()),
                instrument: Some("Cello".to_string()),
                ensemble: None,
            },
            author,
        )
        .await?;
    }

    log::info!(
        "Seeded {} users, ensemble '{}' and one post",
        members.len(),
        ensemble.name
    );
    Ok(())
}

async fn seed_musician<S: Store>(store: &S, musician: &SeedMusician) -> Result<AuthUser> {
    if let Some(existing) = store.find_user_by_username(musician.username).await? {
        return Ok(AuthUser::new(existing.id, existing.username));
    }

    let profile = UserService::create_user(
        store,
        NewUser {
            username: Some(musician.username.to_string()),
            email: Some(format!("{}@bandstand.local", musician.username)),
            password: Some(SEED_PASSWORD.to_string()),
            full_name: Some(musician.full_name.to_string()),
            description: Some(musician.description.to_string()),
        },
    )
    .await?;
    let auth = AuthUser::new(profile.id, profile.username);

    UserService::add_instrument(
        store,
        &auth,
        NewInstrument {
            name: Some(musician.instrument.to_string()),
            genre: Some(musician.genres.iter().map(|g| g.to_string()).collect()),
        },
    )
    .await?;

    Ok(auth)
}
