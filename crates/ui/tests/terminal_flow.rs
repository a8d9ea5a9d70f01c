use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncWriteExt, BufReader};

use quiz_core::model::{CategoryFilter, Question, QuestionId, QuizOption};
use quiz_core::time::fixed_clock;
use services::QuizLoopService;
use storage::{InMemoryQuestionSource, QuestionSource, StorageError};
use ui::{ExamRequest, TerminalPresenter};

fn question(id: u64, options: &[(&str, bool)], category: Option<&str>) -> Question {
    Question::new(
        QuestionId::new(id),
        format!("Question text {id}"),
        options
            .iter()
            .map(|(text, correct)| QuizOption::new(*text, *correct))
            .collect(),
        category.map(str::to_string),
        Some(format!("Rule {id}")),
    )
    .unwrap()
}

fn three_option_bank() -> Vec<Question> {
    (0..3)
        .map(|i| {
            question(
                i,
                &[("yes", true), ("no", false), ("maybe", false)],
                Some(if i == 0 { "Civil" } else { "Penal" }),
            )
        })
        .collect()
}

fn single_option_bank() -> Vec<Question> {
    (0..2).map(|i| question(i, &[("only", true)], None)).collect()
}

async fn run_script(source: Arc<dyn QuestionSource>, request: ExamRequest, script: &str) -> String {
    let service = QuizLoopService::new(fixed_clock(), source).with_seed(7);
    let input = BufReader::new(script.as_bytes());
    let mut presenter = TerminalPresenter::new(service, input, Vec::new()).with_request(request);
    presenter.run().await.unwrap();
    let (_, output) = presenter.into_parts();
    String::from_utf8(output).unwrap()
}

struct BrokenSource;

#[async_trait]
impl QuestionSource for BrokenSource {
    async fn load_questions(&self) -> Result<Vec<Question>, StorageError> {
        Err(StorageError::NotFound)
    }

    fn describe(&self) -> String {
        "preguntas.json".into()
    }
}

#[tokio::test]
async fn skipping_every_question_scores_zero() {
    let source = Arc::new(InMemoryQuestionSource::new(three_option_bank()));
    let output = run_script(source, ExamRequest::default(), "2\nall\nn\nn\nq\n").await;

    assert!(output.contains("There are 3 questions available in the bank."));
    assert!(output.contains("Categories: all, Civil (1), Penal (2)"));
    assert!(output.contains("Ideal time: 3.0 minutes"));
    assert!(output.contains("Question 1 of 2  [00:00]"));
    assert!(output.contains("Question 2 of 2"));
    assert!(output.contains("n finish"));
    assert!(output.contains("Result: 0/2 (0%)"));
    assert!(output.contains("Your answer: (unanswered)"));
    assert!(output.contains("Correct answer: yes"));
    assert!(output.contains("Rationale: Rule"));
    assert!(output.contains("-3 min 00 s (fast)"));
}

#[tokio::test]
async fn answering_by_slot_counts_as_correct() {
    let source = Arc::new(InMemoryQuestionSource::new(single_option_bank()));
    let output = run_script(source, ExamRequest::default(), "2\n1\nn\n1\nn\nq\n").await;

    assert!(!output.contains("Category [all]"));
    assert!(output.contains(" > 1) only"));
    assert!(output.contains("Map: [1x] [2*]"));
    assert!(output.contains("Result: 2/2 (100%)"));
    assert!(output.contains("[ok] Question 1: Question text"));
}

#[tokio::test]
async fn invalid_inputs_are_reported_and_retried() {
    let source = Arc::new(InMemoryQuestionSource::new(three_option_bank()));
    let script = "0\n5\n\n2\nCivil\n3\nall\ng 9\n9\ndance\np\nq\n";
    let output = run_script(source, ExamRequest::default(), script).await;

    assert!(output.contains("Enter a valid number of questions (minimum 1)."));
    assert!(output.contains("There are only 3 questions in the bank."));
    assert!(output.contains("There are only 1 questions in category \"Civil\"."));
    assert!(output.contains("Question 1 of 3"));
    assert!(output.contains("Pick a question between 1 and 3."));
    assert!(output.contains("Pick an option between 1 and 3."));
    assert!(output.contains("unknown command \"dance\""));
    assert!(output.contains("Already at the first question."));
    assert!(!output.contains("Result:"));
}

#[tokio::test]
async fn preset_request_skips_prompts_and_restart_starts_over() {
    let source = Arc::new(InMemoryQuestionSource::new(three_option_bank()));
    let request = ExamRequest {
        count: Some(2),
        category: Some(CategoryFilter::named("Penal")),
    };
    let output = run_script(source, request, "g 2\nr\n1\n\nn\nr\nq\n").await;

    assert!(!output.starts_with("How many questions?"));
    assert!(output.contains("Question 2 of 2"));
    assert!(output.contains("Exam restarted."));
    assert!(output.contains("How many questions?"));
    assert!(output.contains("Question 1 of 1"));
    assert!(output.contains("Result: 0/1 (0%)"));
    assert_eq!(output.matches("Exam restarted.").count(), 2);
}

#[tokio::test]
async fn load_failure_ends_run_with_message() {
    let output = run_script(Arc::new(BrokenSource), ExamRequest::default(), "").await;
    assert!(output.contains("Could not load the question bank"));
    assert!(output.contains("preguntas.json"));
    assert!(!output.contains("How many questions?"));
}

#[tokio::test]
async fn end_of_input_quits_cleanly() {
    let source = Arc::new(InMemoryQuestionSource::new(three_option_bank()));
    let output = run_script(source, ExamRequest::default(), "1\n").await;
    assert!(output.contains("Category [all]: "));
    assert!(!output.contains("Question 1 of 1"));
}

#[tokio::test(start_paused = true)]
async fn idle_exam_prompt_is_redrawn_on_timer_ticks() {
    let source = Arc::new(InMemoryQuestionSource::new(single_option_bank()));
    let service = QuizLoopService::new(fixed_clock(), source).with_seed(7);
    let (mut keyboard, terminal) = tokio::io::duplex(64);
    let request = ExamRequest {
        count: Some(1),
        category: None,
    };
    let mut presenter =
        TerminalPresenter::new(service, BufReader::new(terminal), Vec::new()).with_request(request);

    let typing = async move {
        tokio::time::sleep(Duration::from_secs(3)).await;
        keyboard.write_all(b"q\n").await.unwrap();
    };
    let (result, ()) = tokio::join!(presenter.run(), typing);
    result.unwrap();

    let (_, output) = presenter.into_parts();
    let output = String::from_utf8(output).unwrap();
    assert!(output.contains("Question 1 of 1"));
    assert!(output.matches("\r[00:00] > ").count() >= 2);
}
