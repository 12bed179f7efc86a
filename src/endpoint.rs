/// Which movie list `get-movies` fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieList {
    Popular,
    NowPlaying,
}

impl MovieList {
    /// Popular wins unless only `--now-playing` was given.
    pub fn from_flags(popular: bool, now_playing: bool) -> Self {
        if now_playing && !popular {
            MovieList::NowPlaying
        } else {
            MovieList::Popular
        }
    }

    fn segment(self) -> &'static str {
        match self {
            MovieList::Popular => "popular",
            MovieList::NowPlaying => "now_playing",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MovieList::Popular => "Popular movies",
            MovieList::NowPlaying => "Movies playing now",
        }
    }
}

/// A validated invocation: one variant per request path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    PopularPersons { page: u32 },
    Person { id: String },
    Movies { list: MovieList, page: u32 },
    Movie { id: String },
    MovieReviews { id: String },
}

impl Endpoint {
    pub fn movie(id: impl Into<String>, review: bool) -> Self {
        let id = id.into();
        if review {
            Endpoint::MovieReviews { id }
        } else {
            Endpoint::Movie { id }
        }
    }

    pub fn path(&self) -> String {
        match self {
            Endpoint::PopularPersons { page } => format!("/3/person/popular?page={page}"),
            Endpoint::Person { id } => format!("/3/person/{}", urlencoding::encode(id)),
            Endpoint::Movies { list, page } => {
                format!("/3/movie/{}?page={page}", list.segment())
            }
            Endpoint::Movie { id } => format!("/3/movie/{}", urlencoding::encode(id)),
            Endpoint::MovieReviews { id } => {
                format!("/3/movie/{}/reviews", urlencoding::encode(id))
            }
        }
    }

    pub fn loading_message(&self) -> &'static str {
        match self {
            Endpoint::PopularPersons { .. } => "Fetching the popular persons data...",
            Endpoint::Person { .. } => "Fetching the person's data...",
            Endpoint::Movies { .. } => "Fetching the movies data...",
            Endpoint::Movie { .. } => "Fetching movie data...",
            Endpoint::MovieReviews { .. } => "Fetching movie reviews...",
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            Endpoint::PopularPersons { .. } => "Popular persons data loaded",
            Endpoint::Person { .. } => "Person data loaded",
            Endpoint::Movies {
                list: MovieList::Popular,
                ..
            } => "Popular movies data loaded",
            Endpoint::Movies {
                list: MovieList::NowPlaying,
                ..
            } => "Movies playing now data loaded",
            Endpoint::Movie { .. } => "Movie data loaded",
            Endpoint::MovieReviews { .. } => "Movie reviews data loaded",
        }
    }

    pub fn failure_message(&self) -> &'static str {
        match self {
            Endpoint::PopularPersons { .. } => "Failed to load popular persons",
            Endpoint::Person { .. } => "Failed to load person",
            Endpoint::Movies { .. } => "Failed to load movies",
            Endpoint::Movie { .. } => "Failed to load movie",
            Endpoint::MovieReviews { .. } => "Failed to load movie reviews",
        }
    }
}
