//! Deterministic demo data: 3 admins, 10 clients with 2 to 5 users each, and
//! 20 phones. Every account shares the same password.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::database::models::{Admin, Client, Product, User};

pub const DEFAULT_PASSWORD: &str = "password123";

const BRANDS: [&str; 8] = ["Apple", "Samsung", "Google", "OnePlus", "Xiaomi", "Motorola", "Nokia", "Sony"];
const MODELS: [&str; 8] = ["Pro Max", "Ultra", "Pro", "Lite", "Plus", "Standard", "Air", "Edge"];

const CLIENT_NAMES: [&str; 10] = [
    "Orange Business",
    "SFR Pro",
    "Bouygues Entreprises",
    "Free Pro",
    "Boulanger",
    "Fnac Darty",
    "Cdiscount",
    "Rue du Commerce",
    "LDLC",
    "Materiel.net",
];

const FIRSTNAMES: [&str; 12] = [
    "Camille", "Louis", "Chloé", "Hugo", "Léa", "Lucas", "Manon", "Jules", "Inès", "Arthur", "Sarah", "Nathan",
];

const LASTNAMES: [&str; 12] = [
    "Martin", "Bernard", "Dubois", "Thomas", "Robert", "Richard", "Petit", "Durand", "Leroy", "Moreau", "Simon", "Laurent",
];

#[derive(Debug, Clone)]
pub struct Fixtures {
    pub admins: Vec<Admin>,
    pub clients: Vec<Client>,
    pub products: Vec<Product>,
    pub users: Vec<User>,
}

impl Fixtures {
    /// Builds the data set. `password_hash` is stored for every account.
    pub fn generate(password_hash: &str) -> Self {
        let base = Utc::now() - Duration::days(30);
        let at = |step: i64| -> DateTime<Utc> { base + Duration::minutes(step) };

        let admins = (1..=3)
            .map(|id| Admin {
                id,
                email: format!("admin{}@bilemo.com", id),
                password_hash: password_hash.to_string(),
                role: "ROLE_ADMIN".to_string(),
                created_at: at(id),
                updated_at: at(id),
            })
            .collect();

        let mut clients = Vec::with_capacity(CLIENT_NAMES.len());
        let mut users = Vec::new();
        for (index, name) in CLIENT_NAMES.iter().enumerate() {
            let client_id = index as i64 + 1;
            clients.push(Client {
                id: client_id,
                name: name.to_string(),
                email: format!("client{}@bilemo.com", client_id),
                password_hash: password_hash.to_string(),
                created_at: at(10 + client_id),
                updated_at: at(10 + client_id),
            });

            for _ in 0..users_for(index) {
                let n = users.len();
                let id = n as i64 + 1;
                let firstname = FIRSTNAMES[n % FIRSTNAMES.len()];
                let lastname = LASTNAMES[(n * 5 + index) % LASTNAMES.len()];
                users.push(User {
                    id,
                    firstname: firstname.to_string(),
                    lastname: lastname.to_string(),
                    email: format!("{}.{}{}@example.com", ascii_slug(firstname), ascii_slug(lastname), id),
                    phone: Some(format!("+33 6 {:02} {:02} {:02} {:02}", 10 + n % 90, (n * 7) % 100, (n * 13) % 100, (n * 31) % 100)),
                    client_id,
                    created_at: at(100 + id),
                    updated_at: at(100 + id),
                });
            }
        }

        let products = (0..20usize)
            .map(|i| {
                let id = i as i64 + 1;
                let brand = BRANDS[i % BRANDS.len()];
                let model = MODELS[(i * 3) % MODELS.len()];
                let year = 2023 + i % 3;
                Product {
                    id,
                    name: format!("{} {} {}", brand, model, year),
                    brand: brand.to_string(),
                    model: model.to_string(),
                    price: Decimal::new((299 + (i as i64 * 67) % 1202) * 100 + 99, 2),
                    description: format!("{} {} smartphone, {} edition, unlocked for every carrier.", brand, model, year),
                    image_url: format!("https://images.bilemo.com/products/{}.png", id),
                    availability: i % 5 != 4,
                    created_at: at(200 + id),
                    updated_at: at(200 + id),
                }
            })
            .collect();

        Self { admins, clients, products, users }
    }
}

fn users_for(client_index: usize) -> usize {
    2 + (client_index * 3) % 4
}

fn ascii_slug(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            'é' | 'è' | 'ê' => 'e',
            'ï' | 'î' => 'i',
            c => c.to_ascii_lowercase(),
        })
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generates_expected_volumes() {
        let fixtures = Fixtures::generate("hash");
        assert_eq!(fixtures.admins.len(), 3);
        assert_eq!(fixtures.clients.len(), 10);
        assert_eq!(fixtures.products.len(), 20);

        for client in &fixtures.clients {
            let owned = fixtures.users.iter().filter(|u| u.client_id == client.id).count();
            assert!((2..=5).contains(&owned), "client {} has {} users", client.id, owned);
        }
    }

    #[test]
    fn emails_are_unique_and_ascii() {
        let fixtures = Fixtures::generate("hash");
        let emails: HashSet<_> = fixtures.users.iter().map(|u| u.email.as_str()).collect();
        assert_eq!(emails.len(), fixtures.users.len());
        assert!(fixtures.users.iter().all(|u| u.email.is_ascii()));
    }

    #[test]
    fn products_fit_schema_limits() {
        for product in Fixtures::generate("hash").products {
            assert!(product.name.len() <= 100);
            assert!(product.model.len() <= 20);
            assert!(product.price > Decimal::ZERO);
            assert_eq!(product.price.scale(), 2);
        }
    }
}
