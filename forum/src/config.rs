use platform::config::try_load;

pub struct Config {
    pub port: u16,
    pub login_url: String,
    pub logout_url: String,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("FORUM_PORT", "8080"),
            login_url: try_load("PLATFORM_LOGIN_URL", "/platform/login"),
            logout_url: try_load("PLATFORM_LOGOUT_URL", "/platform/logout"),
        }
    }
}
