use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub base_score: i32,
    pub time_decrement: i32,
    pub default_question_text: String,
    pub default_correct_option_text: String,
    pub default_wrong_option_text: String,
    pub default_first_step_text: String,
    pub default_second_step_text: String,
    pub default_text_answer: String,
    pub true_label: String,
    pub false_label: String,
}

/// Immutable scoring constants handed to the grader at construction.
#[derive(Clone, Copy, Debug)]
pub struct ScoringConfig {
    /// Points awarded for a correct answer before any adjustment.
    pub base_score: i32,
    /// Points subtracted per rank position among earlier correct answers.
    pub time_decrement: i32,
}

/// Placeholder texts used by the type converter when source data is
/// insufficient to fill the target shape.
#[derive(Clone, Debug)]
pub struct ConversionDefaults {
    pub question_text: String,
    pub correct_option_text: String,
    pub wrong_option_text: String,
    pub first_step_text: String,
    pub second_step_text: String,
    pub text_answer: String,
    pub true_label: String,
    pub false_label: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME")
                .unwrap_or_else(|_| "quizcast-local".to_string()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            base_score: env::var("BASE_SCORE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
            time_decrement: env::var("TIME_DECREMENT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            default_question_text: env::var("DEFAULT_QUESTION_TEXT")
                .unwrap_or_else(|_| "Untitled question".to_string()),
            default_correct_option_text: env::var("DEFAULT_CORRECT_OPTION_TEXT")
                .unwrap_or_else(|_| "Option 1".to_string()),
            default_wrong_option_text: env::var("DEFAULT_WRONG_OPTION_TEXT")
                .unwrap_or_else(|_| "Option 2".to_string()),
            default_first_step_text: env::var("DEFAULT_FIRST_STEP_TEXT")
                .unwrap_or_else(|_| "Step 1".to_string()),
            default_second_step_text: env::var("DEFAULT_SECOND_STEP_TEXT")
                .unwrap_or_else(|_| "Step 2".to_string()),
            default_text_answer: env::var("DEFAULT_TEXT_ANSWER")
                .unwrap_or_else(|_| "Answer".to_string()),
            true_label: env::var("TRUE_LABEL").unwrap_or_else(|_| "True".to_string()),
            false_label: env::var("FALSE_LABEL").unwrap_or_else(|_| "False".to_string()),
        }
    }

    pub fn scoring(&self) -> ScoringConfig {
        ScoringConfig {
            base_score: self.base_score,
            time_decrement: self.time_decrement,
        }
    }

    pub fn conversion_defaults(&self) -> ConversionDefaults {
        ConversionDefaults {
            question_text: self.default_question_text.clone(),
            correct_option_text: self.default_correct_option_text.clone(),
            wrong_option_text: self.default_wrong_option_text.clone(),
            first_step_text: self.default_first_step_text.clone(),
            second_step_text: self.default_second_step_text.clone(),
            text_answer: self.default_text_answer.clone(),
            true_label: self.true_label.clone(),
            false_label: self.false_label.clone(),
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "quizcast-test".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            base_score: 100,
            time_decrement: 10,
            default_question_text: "Untitled question".to_string(),
            default_correct_option_text: "Option 1".to_string(),
            default_wrong_option_text: "Option 2".to_string(),
            default_first_step_text: "Step 1".to_string(),
            default_second_step_text: "Step 2".to_string(),
            default_text_answer: "Answer".to_string(),
            true_label: "True".to_string(),
            false_label: "False".to_string(),
        }
    }
}
