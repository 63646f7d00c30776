use futures::future::join_all;
use tracing::{debug, warn};

use crate::{
    model::{Card, CardState, WeatherRequest, same_city},
    provider::WeatherProvider,
};

/// A set of city cards, each filled by its own request.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    cards: Vec<Card>,
}

impl Dashboard {
    /// One `Loading` card per distinct city, in the order given.
    pub fn new<I, S>(cities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cards: Vec<Card> = Vec::new();
        for city in cities {
            let city = city.as_ref().trim();
            if cards.iter().any(|c| same_city(&c.query, city)) {
                continue;
            }
            cards.push(Card::loading(city));
        }
        Self { cards }
    }

    /// Build a dashboard for `cities` and fetch every card concurrently.
    pub async fn load<I, S>(provider: &dyn WeatherProvider, cities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dashboard = Self::new(cities);
        dashboard.refresh(provider).await;
        dashboard
    }

    /// Re-fetch every card. Cards fail independently.
    pub async fn refresh(&mut self, provider: &dyn WeatherProvider) {
        for card in &mut self.cards {
            card.state = CardState::Loading;
        }

        let states = join_all(self.cards.iter().map(|card| fetch_card(provider, &card.query))).await;

        for (card, state) in self.cards.iter_mut().zip(states) {
            card.state = state;
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn into_cards(self) -> Vec<Card> {
        self.cards
    }

    pub fn loaded_count(&self) -> usize {
        self.cards.iter().filter(|c| c.state.is_loaded()).count()
    }
}

async fn fetch_card(provider: &dyn WeatherProvider, query: &str) -> CardState {
    let request = match WeatherRequest::new(query) {
        Ok(r) => r,
        Err(e) => return CardState::Failed(e.to_string()),
    };

    match provider.get_weather(&request).await {
        Ok(report) => {
            debug!(city = %request.city, location = %report.location, "card loaded");
            CardState::Loaded(report)
        }
        Err(e) => {
            warn!(city = %request.city, error = %e, "card failed");
            CardState::Failed(e.to_string())
        }
    }
}
