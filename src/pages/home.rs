//! Landing page. Static content with navigation links only.

#[derive(Debug, Default, Clone, Copy)]
pub struct HomePage;

impl HomePage {
    pub fn render(&self) -> String {
        r#"<div class="home-page">
<div class="hero">
<h1>AIEO - AI Engine Optimization</h1>
<p class="subtitle">Optimize your content to be cited by AI engines like Grok, ChatGPT, and Claude</p>
<div class="cta-buttons">
<a href="/audit" class="btn btn-primary">Audit Content</a>
<a href="/optimize" class="btn btn-secondary">Optimize Content</a>
</div>
</div>
<div class="features">
<div class="feature"><h2>Audit</h2><p>Get a 0-100 AIEO score and identify gaps in your content</p><a href="/audit">Try it &rarr;</a></div>
<div class="feature"><h2>Optimize</h2><p>Apply AIEO patterns to improve citation likelihood</p><a href="/optimize">Try it &rarr;</a></div>
<div class="feature"><h2>Track</h2><p>Monitor citations across AI engines</p><a href="/dashboard">View Dashboard &rarr;</a></div>
</div>
</div>
"#
        .to_string()
    }
}
