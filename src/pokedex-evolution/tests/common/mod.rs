//! In-memory PokéAPI fixture shared by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pokedex_evolution::{
    EvolutionChainResolver, EvolutionError, EvolutionResult, JsonFetcher, ResolverConfig,
};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

pub const API: &str = "https://pokeapi.test/api/v2";

/// Serves canned documents by URL. Unknown URLs answer 404, URLs marked with
/// [`StaticFetcher::fail`] answer 500.
#[derive(Default)]
pub struct StaticFetcher {
    documents: HashMap<String, Value>,
    failing: HashSet<String>,
    delay: Option<Duration>,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    cancel_trigger: Option<(String, usize, CancellationToken)>,
}

fn normalize(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold every response for `delay` so overlapping requests can be observed.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn insert(&mut self, url: &str, document: Value) {
        self.documents.insert(normalize(url), document);
    }

    pub fn fail(&mut self, url: &str) {
        self.failing.insert(normalize(url));
    }

    /// Cancel `token` when `url` is requested for the `nth` time (1-based).
    pub fn cancel_on(&mut self, url: &str, nth: usize, token: CancellationToken) {
        self.cancel_trigger = Some((normalize(url), nth, token));
    }

    /// `pokemon-species` document, reachable by id and by name. The first
    /// variety is the default one; with no varieties the species itself is.
    pub fn species(&mut self, id: u32, name: &str, chain: Option<u32>, varieties: &[(&str, u32)]) {
        let varieties: Vec<(&str, u32)> = if varieties.is_empty() {
            vec![(name, id)]
        } else {
            varieties.to_vec()
        };
        let document = json!({
            "id": id,
            "name": name,
            "evolution_chain": chain.map(|c| json!({ "url": format!("{API}/evolution-chain/{c}/") })),
            "varieties": varieties
                .iter()
                .enumerate()
                .map(|(i, (variety, variety_id))| json!({
                    "is_default": i == 0,
                    "pokemon": { "name": variety, "url": format!("{API}/pokemon/{variety_id}/") }
                }))
                .collect::<Vec<_>>(),
        });
        self.insert(&format!("{API}/pokemon-species/{id}"), document.clone());
        self.insert(&format!("{API}/pokemon-species/{name}"), document);
    }

    /// `pokemon` document, reachable by id and by name.
    pub fn pokemon(&mut self, id: u32, name: &str, types: &[&str], species_id: u32) {
        let document = json!({
            "id": id,
            "name": name,
            "types": types
                .iter()
                .enumerate()
                .map(|(i, t)| json!({ "slot": i + 1, "type": { "name": t, "url": "" } }))
                .collect::<Vec<_>>(),
            "sprites": {
                "front_default": format!("https://img.test/{id}.png"),
                "front_shiny": null
            },
            "species": { "name": "", "url": format!("{API}/pokemon-species/{species_id}/") }
        });
        self.insert(&format!("{API}/pokemon/{id}"), document.clone());
        self.insert(&format!("{API}/pokemon/{name}"), document);
    }

    pub fn chain(&mut self, id: u32, root: Value) {
        self.insert(
            &format!("{API}/evolution-chain/{id}"),
            json!({ "id": id, "chain": root }),
        );
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JsonFetcher for StaticFetcher {
    async fn fetch_json(&self, url: &str) -> EvolutionResult<Value> {
        let key = normalize(url);
        let seen = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(key.clone());
            calls.iter().filter(|call| **call == key).count()
        };
        if let Some((trigger, nth, token)) = &self.cancel_trigger
            && *trigger == key
            && seen == *nth
        {
            token.cancel();
        }

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(&key) {
            return Err(EvolutionError::HttpStatus {
                status: 500,
                url: url.to_string(),
            });
        }
        self.documents
            .get(&key)
            .cloned()
            .ok_or_else(|| EvolutionError::HttpStatus {
                status: 404,
                url: url.to_string(),
            })
    }
}

pub fn config() -> ResolverConfig {
    ResolverConfig {
        api_base_url: API.to_string(),
        cache_capacity: 0,
        ..Default::default()
    }
}

pub fn resolver(fetcher: StaticFetcher) -> (EvolutionChainResolver, Arc<StaticFetcher>) {
    resolver_with(fetcher, &config())
}

pub fn resolver_with(
    fetcher: StaticFetcher,
    config: &ResolverConfig,
) -> (EvolutionChainResolver, Arc<StaticFetcher>) {
    let fetcher = Arc::new(fetcher);
    let resolver = EvolutionChainResolver::new(fetcher.clone(), config).expect("resolver");
    (resolver, fetcher)
}

pub fn species_url(id: u32) -> String {
    format!("{API}/pokemon-species/{id}/")
}

/// Chain link JSON.
pub fn link(name: &str, id: u32, details: Vec<Value>, children: Vec<Value>) -> Value {
    json!({
        "species": { "name": name, "url": species_url(id) },
        "is_baby": false,
        "evolution_details": details,
        "evolves_to": children,
    })
}

pub fn level_up(level: u32) -> Value {
    json!({ "trigger": { "name": "level-up", "url": "" }, "min_level": level })
}

pub fn use_item(item: &str) -> Value {
    json!({
        "trigger": { "name": "use-item", "url": "" },
        "item": { "name": item, "url": "" }
    })
}

pub fn friendship(time_of_day: &str) -> Value {
    json!({
        "trigger": { "name": "level-up", "url": "" },
        "min_happiness": 160,
        "time_of_day": time_of_day
    })
}

pub fn bulbasaur_line(f: &mut StaticFetcher) {
    f.species(1, "bulbasaur", Some(1), &[]);
    f.species(2, "ivysaur", Some(1), &[]);
    f.species(3, "venusaur", Some(1), &[("venusaur", 3), ("venusaur-mega", 10033)]);
    f.pokemon(1, "bulbasaur", &["grass", "poison"], 1);
    f.pokemon(2, "ivysaur", &["grass", "poison"], 2);
    f.pokemon(3, "venusaur", &["grass", "poison"], 3);
    f.pokemon(10033, "venusaur-mega", &["grass", "poison"], 3);
    f.chain(
        1,
        link(
            "bulbasaur",
            1,
            vec![],
            vec![link(
                "ivysaur",
                2,
                vec![level_up(16)],
                vec![link("venusaur", 3, vec![level_up(32)], vec![])],
            )],
        ),
    );
}

/// Branching chain: wurmple -> [silcoon -> beautifly, cascoon -> dustox].
pub fn wurmple_line(f: &mut StaticFetcher) {
    for (id, name, types) in [
        (265, "wurmple", &["bug"][..]),
        (266, "silcoon", &["bug"][..]),
        (267, "beautifly", &["bug", "flying"][..]),
        (268, "cascoon", &["bug"][..]),
        (269, "dustox", &["bug", "poison"][..]),
    ] {
        f.species(id, name, Some(135), &[]);
        f.pokemon(id, name, types, id);
    }
    f.chain(
        135,
        link(
            "wurmple",
            265,
            vec![],
            vec![
                link(
                    "silcoon",
                    266,
                    vec![level_up(7)],
                    vec![link("beautifly", 267, vec![level_up(10)], vec![])],
                ),
                link(
                    "cascoon",
                    268,
                    vec![level_up(7)],
                    vec![link("dustox", 269, vec![level_up(10)], vec![])],
                ),
            ],
        ),
    );
}

pub fn meowth_line(f: &mut StaticFetcher) {
    f.species(
        52,
        "meowth",
        Some(22),
        &[("meowth", 52), ("meowth-alola", 10107), ("meowth-galar", 10161)],
    );
    f.species(53, "persian", Some(22), &[("persian", 53), ("persian-alola", 10108)]);
    f.species(863, "perrserker", Some(22), &[]);
    f.pokemon(52, "meowth", &["normal"], 52);
    f.pokemon(10107, "meowth-alola", &["dark"], 52);
    f.pokemon(10161, "meowth-galar", &["steel"], 52);
    f.pokemon(53, "persian", &["normal"], 53);
    f.pokemon(10108, "persian-alola", &["dark"], 53);
    f.pokemon(863, "perrserker", &["steel"], 863);
    f.chain(
        22,
        link(
            "meowth",
            52,
            vec![],
            vec![
                link("persian", 53, vec![level_up(28)], vec![]),
                link("perrserker", 863, vec![level_up(28)], vec![]),
            ],
        ),
    );
}

pub fn slowpoke_line(f: &mut StaticFetcher) {
    f.species(
        79,
        "slowpoke",
        Some(33),
        &[("slowpoke", 79), ("slowpoke-galar", 10164)],
    );
    f.species(
        80,
        "slowbro",
        Some(33),
        &[("slowbro", 80), ("slowbro-mega", 10071), ("slowbro-galar", 10165)],
    );
    f.species(
        199,
        "slowking",
        Some(33),
        &[("slowking", 199), ("slowking-galar", 10172)],
    );
    f.pokemon(79, "slowpoke", &["water", "psychic"], 79);
    f.pokemon(10164, "slowpoke-galar", &["psychic"], 79);
    f.pokemon(80, "slowbro", &["water", "psychic"], 80);
    f.pokemon(10071, "slowbro-mega", &["water", "psychic"], 80);
    f.pokemon(10165, "slowbro-galar", &["poison", "psychic"], 80);
    f.pokemon(199, "slowking", &["water", "psychic"], 199);
    f.pokemon(10172, "slowking-galar", &["poison", "psychic"], 199);
    f.chain(
        33,
        link(
            "slowpoke",
            79,
            vec![],
            vec![
                link("slowbro", 80, vec![level_up(37), use_item("galarica-cuff")], vec![]),
                link("slowking", 199, vec![use_item("kings-rock")], vec![]),
            ],
        ),
    );
}

pub const EEVEELUTIONS: [(u32, &str, &str); 8] = [
    (134, "vaporeon", "water"),
    (135, "jolteon", "electric"),
    (136, "flareon", "fire"),
    (196, "espeon", "psychic"),
    (197, "umbreon", "dark"),
    (470, "leafeon", "grass"),
    (471, "glaceon", "ice"),
    (700, "sylveon", "fairy"),
];

pub fn eevee_line(f: &mut StaticFetcher) {
    f.species(133, "eevee", Some(67), &[("eevee", 133), ("eevee-starter", 10159)]);
    f.pokemon(133, "eevee", &["normal"], 133);
    f.pokemon(10159, "eevee-starter", &["normal"], 133);
    let mut children = Vec::new();
    for (id, name, kind) in EEVEELUTIONS {
        f.species(id, name, Some(67), &[]);
        f.pokemon(id, name, &[kind], id);
        children.push(link(name, id, vec![friendship("day")], vec![]));
    }
    f.chain(67, link("eevee", 133, vec![], children));
}

pub fn pikachu_line(f: &mut StaticFetcher) {
    f.species(172, "pichu", Some(10), &[]);
    f.species(
        25,
        "pikachu",
        Some(10),
        &[
            ("pikachu", 25),
            ("pikachu-rock-star", 10080),
            ("pikachu-alola-cap", 10099),
            ("pikachu-totem-alola", 10125),
            ("pikachu-gmax", 10199),
        ],
    );
    f.species(26, "raichu", Some(10), &[("raichu", 26), ("raichu-alola", 10100)]);
    f.pokemon(172, "pichu", &["electric"], 172);
    f.pokemon(25, "pikachu", &["electric"], 25);
    f.pokemon(10080, "pikachu-rock-star", &["electric"], 25);
    f.pokemon(10099, "pikachu-alola-cap", &["electric"], 25);
    f.pokemon(10125, "pikachu-totem-alola", &["electric"], 25);
    f.pokemon(10199, "pikachu-gmax", &["electric"], 25);
    f.pokemon(26, "raichu", &["electric"], 26);
    f.pokemon(10100, "raichu-alola", &["electric", "psychic"], 26);
    f.chain(
        10,
        link(
            "pichu",
            172,
            vec![],
            vec![link(
                "pikachu",
                25,
                vec![friendship("")],
                vec![link("raichu", 26, vec![use_item("thunder-stone")], vec![])],
            )],
        ),
    );
}

pub fn ditto(f: &mut StaticFetcher) {
    f.species(132, "ditto", None, &[]);
    f.pokemon(132, "ditto", &["normal"], 132);
}
