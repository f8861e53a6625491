//! Writing objects to channel text and reading them back.
//!
//! Run with: cargo run --example simple

use objchan::io::StrSource;
use objchan::{to_string, Channel, Dump, Error, Field, Load, Persist, Result};

#[derive(Debug, PartialEq)]
enum Account {
    User { id: i64, name: String },
    Admin { id: i64, name: String, level: i64 },
}

const USER: &[&str] = &["User"];
const ADMIN: &[&str] = &["User", "Admin"];

impl Persist for Account {
    fn class_name(&self) -> &'static str {
        match self {
            Account::User { .. } => "User",
            Account::Admin { .. } => "Admin",
        }
    }

    fn ancestry_of(class: &str) -> Option<&'static [&'static str]> {
        match class {
            "User" => Some(USER),
            "Admin" => Some(ADMIN),
            _ => None,
        }
    }

    fn class_comment(class: &str) -> Option<&'static str> {
        match class {
            "User" => Some("A registered user"),
            "Admin" => Some("A user with elevated rights"),
            _ => None,
        }
    }

    fn dump<'a>(&'a self, class: &str, dump: &mut Dump<'a, Self>) -> Result<()> {
        match (class, self) {
            ("User", Account::User { id, name }) | ("User", Account::Admin { id, name, .. }) => {
                dump.scalar(Field::new("Id", *id).comment("Account number"))?;
                dump.scalar(Field::new("Name", name.as_str()).comment("Display name"))
            }
            ("Admin", Account::Admin { level, .. }) => dump.scalar(
                Field::new("Level", *level)
                    .set(*level != 1)
                    .helpful(true)
                    .comment("Privilege level"),
            ),
            _ => Ok(()),
        }
    }

    fn load(class: &str, partial: Option<Self>, load: &mut Load<'_, Self>) -> Result<Self> {
        match (class, partial) {
            ("User", _) => Ok(Account::User {
                id: load.read_int("Id", 0),
                name: load.read_string("Name").unwrap_or_default(),
            }),
            ("Admin", Some(Account::User { id, name })) => Ok(Account::Admin {
                id,
                name,
                level: load.read_int("Level", 1),
            }),
            (class, _) => Err(Error::unknown_class(class)),
        }
    }
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let accounts = vec![
        Account::User {
            id: 42,
            name: "Alice Johnson".to_string(),
        },
        Account::Admin {
            id: 43,
            name: "Bob \"root\" Smith".to_string(),
            level: 1,
        },
    ];

    let mut text = String::new();
    for account in &accounts {
        text.push_str(&to_string(account)?);
    }
    println!("Channel output:\n{}", text);

    let mut channel = Channel::from_source(StrSource::new(&text));
    let back: Vec<Account> = channel.read_all()?;
    assert_eq!(accounts, back);
    println!("Round-trip successful");

    // Unknown fields are reported rather than rejected
    let edited = "Begin User\n   Id = 7\n   Name = \"Carol\"\n   Email = \"c@example.com\"\nEnd User\n";
    let mut channel = Channel::from_source(StrSource::new(edited));
    let carol: Option<Account> = channel.read()?;
    println!("\nRead {:?}", carol);
    for (id, warning) in channel.warnings() {
        println!("warning {}: {}", id, warning);
    }

    Ok(())
}
