//! Embedded third-party video player

use crate::rendering::Node;

const ALLOW: &str = "accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture; web-share";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoEmbed {
    video_id: String,
}

impl VideoEmbed {
    pub fn youtube(video_id: &str) -> Self {
        Self {
            video_id: video_id.to_string(),
        }
    }

    pub fn embed_url(&self) -> String {
        format!("https://www.youtube.com/embed/{}", self.video_id)
    }

    pub fn render(&self) -> Node {
        Node::element("div").class("video-frame").child(
            Node::element("iframe")
                .attr("src", self.embed_url())
                .attr("title", "YouTube video player")
                .attr("frameborder", "0")
                .attr("allow", ALLOW)
                .attr("allowfullscreen", ""),
        )
    }
}
