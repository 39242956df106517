use uuid::Uuid;

use crate::database::TeamWithCaptain;
use super::leaderboard::player_display_name;

const CODE_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Random upper-case base-36 code of `len` characters, drawn from a v4 UUID.
pub fn generate_team_code(len: usize) -> String {
    let mut bits = Uuid::new_v4().as_u128();
    let mut code = String::with_capacity(len);
    for _ in 0..len {
        if bits == 0 {
            bits = Uuid::new_v4().as_u128();
        }
        code.push(CODE_ALPHABET[(bits % 36) as usize] as char);
        bits /= 36;
    }
    code
}

pub fn normalize_team_code(input: &str) -> String {
    input.trim().to_uppercase()
}

pub fn captain_name(team: &TeamWithCaptain) -> String {
    player_display_name(team.captain_username.as_deref(), team.captain_full_name.as_deref())
}

/// Case-insensitive match on team name, region or captain name.
pub fn matches_search(team: &TeamWithCaptain, search: &str) -> bool {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    let contains = |value: &str| value.to_lowercase().contains(&needle);

    contains(&team.team.name)
        || team.team.region.as_deref().is_some_and(contains)
        || contains(&captain_name(team))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Team;
    use chrono::Utc;

    fn listed(name: &str, region: Option<&str>, captain: Option<&str>) -> TeamWithCaptain {
        TeamWithCaptain {
            team: Team {
                id: "id".to_string(),
                name: name.to_string(),
                bio: None,
                region: region.map(str::to_string),
                logo_url: None,
                captain_id: "cap".to_string(),
                team_code: "ABC123".to_string(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            captain_username: captain.map(str::to_string),
            captain_full_name: None,
            member_count: 1,
        }
    }

    #[test]
    fn test_code_shape() {
        for _ in 0..50 {
            let code = generate_team_code(6);
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
        }
        assert_eq!(generate_team_code(40).len(), 40);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_team_code("  ab12cd \n"), "AB12CD");
    }

    #[test]
    fn test_search_fields() {
        let team = listed("Neon Strikers", Some("Mumbai"), Some("blaze"));

        assert!(matches_search(&team, "neon"));
        assert!(matches_search(&team, "MUM"));
        assert!(matches_search(&team, "Blaze"));
        assert!(matches_search(&team, "  "));
        assert!(!matches_search(&team, "delhi"));
        assert_eq!(captain_name(&listed("x", None, None)), "Unknown Player");
    }
}
