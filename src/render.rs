use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::Value;

use crate::endpoint::{Endpoint, MovieList};
use crate::error::{MovieDbError, Result};
use crate::models::{Movie, MovieSummary, Page, Person, PersonSummary, Review};

pub const REVIEW_EXCERPT_CHARS: usize = 280;

/// Builds every output line for `payload` before anything is printed, so a
/// shape error never leaves partial output behind.
pub fn render(endpoint: &Endpoint, payload: &Value) -> Result<Vec<String>> {
    let today = Local::now().date_naive();
    let lines = match endpoint {
        Endpoint::PopularPersons { .. } => build_person_page_lines(&view(payload)?),
        Endpoint::Person { .. } => build_person_lines(&view(payload)?, today),
        Endpoint::Movies { list, .. } => build_movie_page_lines(*list, &view(payload)?),
        Endpoint::Movie { .. } => build_movie_lines(&view(payload)?),
        Endpoint::MovieReviews { id } => build_review_lines(id, &view(payload)?),
    };
    Ok(lines)
}

/// Fallback rendering: the payload as pretty-printed JSON.
pub fn raw_lines(payload: &Value) -> Result<Vec<String>> {
    let text = serde_json::to_string_pretty(payload).map_err(MovieDbError::Render)?;
    Ok(text.lines().map(str::to_owned).collect())
}

fn view<'a, T: Deserialize<'a>>(payload: &'a Value) -> Result<T> {
    T::deserialize(payload).map_err(MovieDbError::Render)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

pub fn format_date(value: &str) -> String {
    match parse_date(value) {
        Some(date) => date.format("%B %-d, %Y").to_string(),
        None => value.trim().to_string(),
    }
}

pub fn format_runtime(minutes: u32) -> String {
    format!("{}h {:02}m", minutes / 60, minutes % 60)
}

pub fn format_rating(vote_average: f64) -> String {
    format!("{vote_average:.1}/10")
}

pub fn age_on(born: NaiveDate, on: NaiveDate) -> Option<u32> {
    on.years_since(born)
}

/// Collapses whitespace and cuts `text` to at most `max` characters.
pub fn excerpt(text: &str, max: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max {
        return collapsed;
    }
    let cut: String = collapsed.chars().take(max).collect();
    format!("{}...", cut.trim_end())
}

fn page_header<T>(page: &Page<T>) -> String {
    let number = page.page.unwrap_or(1);
    match (page.total_pages, page.total_results) {
        (Some(pages), Some(results)) => format!("Page {number} of {pages} ({results} results)"),
        (Some(pages), None) => format!("Page {number} of {pages}"),
        _ => format!("Page {number}"),
    }
}

pub fn build_person_page_lines(page: &Page<PersonSummary>) -> Vec<String> {
    let mut lines = vec![format!("Popular persons, {}", page_header(page))];
    for person in &page.results {
        let mut line = format!("- {} (id {})", person.name, person.id);
        if let Some(department) = non_empty(person.known_for_department.as_deref()) {
            line.push_str(&format!(" [{department}]"));
        }
        lines.push(line);

        let titles: Vec<&str> = person
            .known_for
            .iter()
            .filter_map(|k| non_empty(k.display_title()))
            .collect();
        if !titles.is_empty() {
            lines.push(format!("  known for: {}", titles.join(", ")));
        }
    }
    lines
}

pub fn build_person_lines(person: &Person, today: NaiveDate) -> Vec<String> {
    let mut lines = vec![format!("{} (id {})", person.name, person.id)];
    if let Some(department) = non_empty(person.known_for_department.as_deref()) {
        lines.push(format!("  department: {department}"));
    }

    let born = non_empty(person.birthday.as_deref());
    let died = non_empty(person.deathday.as_deref());
    if let Some(born) = born {
        let mut line = format!("  born: {}", format_date(born));
        if let Some(place) = non_empty(person.place_of_birth.as_deref()) {
            line.push_str(&format!(" in {place}"));
        }
        if died.is_none() {
            if let Some(age) = parse_date(born).and_then(|b| age_on(b, today)) {
                line.push_str(&format!(" (age {age})"));
            }
        }
        lines.push(line);
    } else if let Some(place) = non_empty(person.place_of_birth.as_deref()) {
        lines.push(format!("  born in: {place}"));
    }
    if let Some(died) = died {
        let mut line = format!("  died: {}", format_date(died));
        let age = born
            .and_then(parse_date)
            .zip(parse_date(died))
            .and_then(|(b, d)| age_on(b, d));
        if let Some(age) = age {
            line.push_str(&format!(" (aged {age})"));
        }
        lines.push(line);
    }

    if let Some(popularity) = person.popularity {
        lines.push(format!("  popularity: {popularity:.1}"));
    }
    if let Some(homepage) = non_empty(person.homepage.as_deref()) {
        lines.push(format!("  homepage: {homepage}"));
    }
    if let Some(biography) = non_empty(person.biography.as_deref()) {
        lines.push(String::new());
        lines.extend(biography.lines().map(|l| format!("  {}", l.trim_end())));
    }
    lines
}

pub fn build_movie_page_lines(list: MovieList, page: &Page<MovieSummary>) -> Vec<String> {
    let mut lines = vec![format!("{}, {}", list.label(), page_header(page))];
    for movie in &page.results {
        let mut line = format!("- {}", movie.title);
        if let Some(date) = movie.release_date.as_deref().and_then(parse_date) {
            line.push_str(&date.format(" (%Y)").to_string());
        }
        line.push_str(&format!(" id {}", movie.id));
        if let Some(average) = movie.vote_average {
            line.push_str(&format!(" rating {}", format_rating(average)));
        }
        lines.push(line);
    }
    lines
}

pub fn build_movie_lines(movie: &Movie) -> Vec<String> {
    let mut lines = vec![format!("{} (id {})", movie.title, movie.id)];
    if let Some(tagline) = non_empty(movie.tagline.as_deref()) {
        lines.push(format!("  \"{tagline}\""));
    }
    if let Some(released) = non_empty(movie.release_date.as_deref()) {
        lines.push(format!("  released: {}", format_date(released)));
    }
    if let Some(runtime) = movie.runtime.filter(|&m| m > 0) {
        lines.push(format!("  runtime: {}", format_runtime(runtime)));
    }
    if let Some(average) = movie.vote_average {
        let mut line = format!("  rating: {}", format_rating(average));
        if let Some(count) = movie.vote_count {
            line.push_str(&format!(" ({count} votes)"));
        }
        lines.push(line);
    }
    if !movie.genres.is_empty() {
        let names: Vec<&str> = movie.genres.iter().map(|g| g.name.as_str()).collect();
        lines.push(format!("  genres: {}", names.join(", ")));
    }
    if let Some(status) = non_empty(movie.status.as_deref()) {
        lines.push(format!("  status: {status}"));
    }
    if let Some(overview) = non_empty(movie.overview.as_deref()) {
        lines.push(String::new());
        lines.push(format!("  {overview}"));
    }
    lines
}

pub fn build_review_lines(movie_id: &str, page: &Page<Review>) -> Vec<String> {
    if page.results.is_empty() {
        return vec![format!("No reviews found for movie {movie_id}")];
    }
    let mut lines = vec![format!("Reviews for movie {movie_id}, {}", page_header(page))];
    for (index, review) in page.results.iter().enumerate() {
        if index > 0 {
            lines.push(String::new());
        }
        let mut line = format!("- {}", review.author);
        if let Some(rating) = review.author_details.as_ref().and_then(|d| d.rating) {
            line.push_str(&format!(" rated {}", format_rating(rating)));
        }
        lines.push(line);
        if let Some(url) = non_empty(review.url.as_deref()) {
            lines.push(format!("  {url}"));
        }
        if let Some(content) = non_empty(review.content.as_deref()) {
            lines.push(format!("  {}", excerpt(content, REVIEW_EXCERPT_CHARS)));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn format_date_long_form() {
        assert_eq!(format_date("2019-04-24"), "April 24, 2019");
    }

    #[test]
    fn format_date_passes_unparsable_through() {
        assert_eq!(format_date("sometime"), "sometime");
    }

    #[test]
    fn format_runtime_pads_minutes() {
        assert_eq!(format_runtime(181), "3h 01m");
        assert_eq!(format_runtime(45), "0h 45m");
    }

    #[test]
    fn format_rating_one_decimal() {
        assert_eq!(format_rating(8.263), "8.3/10");
        assert_eq!(format_rating(7.0), "7.0/10");
    }

    #[test]
    fn age_counts_completed_years() {
        assert_eq!(age_on(date(1964, 9, 2), date(2026, 9, 1)), Some(61));
        assert_eq!(age_on(date(1964, 9, 2), date(2026, 9, 2)), Some(62));
        assert_eq!(age_on(date(2030, 1, 1), date(2026, 1, 1)), None);
    }

    #[test]
    fn excerpt_collapses_and_truncates() {
        assert_eq!(excerpt("a\r\n\r\nb   c", 10), "a b c");
        assert_eq!(excerpt("abcdef ghij", 7), "abcdef...");
    }

    #[test]
    fn excerpt_counts_characters_not_bytes() {
        assert_eq!(excerpt("ééééé", 3), "ééé...");
    }

    #[test]
    fn person_page_lines() {
        let payload = json!({
            "page": 1,
            "total_pages": 500,
            "total_results": 10000,
            "results": [{
                "id": 1136406,
                "name": "Tom Holland",
                "known_for_department": "Acting",
                "known_for": [{"title": "Spider-Man: No Way Home"}, {"name": "The Crowded Room"}]
            }]
        });
        let lines = render(&Endpoint::PopularPersons { page: 1 }, &payload).unwrap();
        assert_eq!(
            lines,
            vec![
                "Popular persons, Page 1 of 500 (10000 results)",
                "- Tom Holland (id 1136406) [Acting]",
                "  known for: Spider-Man: No Way Home, The Crowded Room",
            ]
        );
    }

    #[test]
    fn person_lines_with_age() {
        let person: Person = serde_json::from_value(json!({
            "id": 6384,
            "name": "Keanu Reeves",
            "known_for_department": "Acting",
            "birthday": "1964-09-02",
            "deathday": null,
            "place_of_birth": "Beirut, Lebanon",
            "homepage": "",
            "biography": "Keanu Charles Reeves is a Canadian actor."
        }))
        .unwrap();
        let lines = build_person_lines(&person, date(2026, 10, 16));
        assert_eq!(lines[0], "Keanu Reeves (id 6384)");
        assert_eq!(lines[1], "  department: Acting");
        assert_eq!(lines[2], "  born: September 2, 1964 in Beirut, Lebanon (age 62)");
        assert!(!lines.iter().any(|l| l.contains("homepage")));
        assert_eq!(lines.last().unwrap(), "  Keanu Charles Reeves is a Canadian actor.");
    }

    #[test]
    fn person_lines_with_deathday() {
        let person: Person = serde_json::from_value(json!({
            "id": 1,
            "name": "Someone",
            "birthday": "1930-05-31",
            "deathday": "2000-05-30"
        }))
        .unwrap();
        let lines = build_person_lines(&person, date(2026, 10, 16));
        assert_eq!(lines[1], "  born: May 31, 1930");
        assert_eq!(lines[2], "  died: May 30, 2000 (aged 69)");
    }

    #[test]
    fn movie_page_lines() {
        let payload = json!({
            "page": 6,
            "total_pages": 40,
            "results": [
                {"id": 299534, "title": "Avengers: Endgame", "release_date": "2019-04-24", "vote_average": 8.26},
                {"id": 7, "title": "Untitled", "release_date": ""}
            ]
        });
        let endpoint = Endpoint::Movies {
            list: MovieList::Popular,
            page: 6,
        };
        let lines = render(&endpoint, &payload).unwrap();
        assert_eq!(lines[0], "Popular movies, Page 6 of 40");
        assert_eq!(lines[1], "- Avengers: Endgame (2019) id 299534 rating 8.3/10");
        assert_eq!(lines[2], "- Untitled id 7");
    }

    #[test]
    fn movie_lines() {
        let payload = json!({
            "id": 385128,
            "title": "Fast X",
            "tagline": "The end of the road begins.",
            "release_date": "2023-05-17",
            "runtime": 142,
            "vote_average": 7.2,
            "vote_count": 5000,
            "genres": [{"id": 28, "name": "Action"}, {"id": 80, "name": "Crime"}],
            "status": "Released",
            "overview": "Dom Toretto and his family are targeted."
        });
        let lines = render(&Endpoint::movie("385128", false), &payload).unwrap();
        assert_eq!(
            lines,
            vec![
                "Fast X (id 385128)",
                "  \"The end of the road begins.\"",
                "  released: May 17, 2023",
                "  runtime: 2h 22m",
                "  rating: 7.2/10 (5000 votes)",
                "  genres: Action, Crime",
                "  status: Released",
                "",
                "  Dom Toretto and his family are targeted.",
            ]
        );
    }

    #[test]
    fn review_lines() {
        let payload = json!({
            "id": 385128,
            "page": 1,
            "total_pages": 1,
            "total_results": 2,
            "results": [
                {"author": "alice", "author_details": {"rating": 8.0}, "url": "https://example.com/r/1", "content": "Great\r\nfun."},
                {"author": "bob", "author_details": {"rating": null}, "content": "Meh."}
            ]
        });
        let lines = render(&Endpoint::movie("385128", true), &payload).unwrap();
        assert_eq!(
            lines,
            vec![
                "Reviews for movie 385128, Page 1 of 1 (2 results)",
                "- alice rated 8.0/10",
                "  https://example.com/r/1",
                "  Great fun.",
                "",
                "- bob",
                "  Meh.",
            ]
        );
    }

    #[test]
    fn review_lines_empty() {
        let payload = json!({"id": 1, "page": 1, "results": []});
        let lines = render(&Endpoint::movie("1", true), &payload).unwrap();
        assert_eq!(lines, vec!["No reviews found for movie 1"]);
    }

    #[test]
    fn missing_required_field_is_render_error() {
        let payload = json!({"page": 1, "results": [{"id": 1}]});
        let err = render(&Endpoint::PopularPersons { page: 1 }, &payload).unwrap_err();
        assert!(matches!(err, MovieDbError::Render(_)));
    }

    #[test]
    fn raw_lines_pretty_prints() {
        let lines = raw_lines(&json!({"a": 1})).unwrap();
        assert_eq!(lines, vec!["{", "  \"a\": 1", "}"]);
    }
}
